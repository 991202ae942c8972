//! Optional live-diagnostics sink.
//!
//! A physics instance created with a Pvd streams one JSON frame per fetched
//! step to a TCP endpoint. Connection failure is an ordinary `false`, never
//! an error: headless runs are the common case. On wasm32 there is no socket
//! to open and `connect` always reports false.

use serde::Serialize;

use crate::handles::FoundationHandle;
use crate::math::{Quat, Vec3};

pub struct Pvd {
    pub foundation: FoundationHandle,
    endpoint: Option<(String, u16)>,
    #[cfg(not(target_arch = "wasm32"))]
    stream: Option<std::net::TcpStream>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PvdFrame {
    pub frame: u64,
    pub sim_time: f64,
    pub actors: Vec<PvdActorState>,
}

#[derive(Serialize)]
pub(crate) struct PvdActorState {
    pub id: u64,
    pub p: Vec3,
    pub q: Quat,
}

impl Pvd {
    pub fn new(foundation: FoundationHandle) -> Self {
        Self {
            foundation,
            endpoint: None,
            #[cfg(not(target_arch = "wasm32"))]
            stream: None,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn connect(&mut self, host: &str, port: u16) -> bool {
        match std::net::TcpStream::connect((host, port)) {
            Ok(stream) => {
                log::info!("pvd connected to {}:{}", host, port);
                self.endpoint = Some((host.to_string(), port));
                self.stream = Some(stream);
                true
            }
            Err(err) => {
                log::warn!("pvd connection to {}:{} failed: {}", host, port, err);
                false
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn connect(&mut self, host: &str, port: u16) -> bool {
        log::warn!("pvd connection to {}:{} unavailable on this target", host, port);
        self.endpoint = Some((host.to_string(), port));
        false
    }

    pub fn is_connected(&self) -> bool {
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.stream.is_some()
        }
        #[cfg(target_arch = "wasm32")]
        {
            false
        }
    }

    pub fn disconnect(&mut self) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            if self.stream.take().is_some() {
                log::info!("pvd disconnected");
            }
        }
        self.endpoint = None;
    }

    /// Best-effort frame push; a write failure drops the connection but
    /// never fails the step that produced the frame.
    #[cfg(not(target_arch = "wasm32"))]
    pub(crate) fn send_frame(&mut self, frame: &PvdFrame) {
        use std::io::Write;

        let Some(stream) = self.stream.as_mut() else {
            return;
        };
        let result = serde_json::to_writer(&mut *stream, frame)
            .map_err(std::io::Error::other)
            .and_then(|_| stream.write_all(b"\n"));
        if let Err(err) = result {
            log::warn!("pvd stream write failed, disconnecting: {}", err);
            self.stream = None;
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub(crate) fn send_frame(&mut self, _frame: &PvdFrame) {}
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader};
    use std::net::TcpListener;

    #[test]
    fn connect_to_unreachable_endpoint_returns_false() {
        let mut pvd = Pvd::new(FoundationHandle::from_raw(0));
        // Port 1 is essentially never listening.
        assert!(!pvd.connect("127.0.0.1", 1));
        assert!(!pvd.is_connected());
    }

    #[test]
    fn frames_arrive_as_json_lines() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let mut pvd = Pvd::new(FoundationHandle::from_raw(0));
        assert!(pvd.connect("127.0.0.1", port));
        assert!(pvd.is_connected());

        let (server_side, _) = listener.accept().unwrap();
        pvd.send_frame(&PvdFrame {
            frame: 3,
            sim_time: 0.05,
            actors: vec![PvdActorState {
                id: 9,
                p: Vec3::new(1.0, 2.0, 3.0),
                q: Quat::identity(),
            }],
        });

        let mut line = String::new();
        BufReader::new(server_side).read_line(&mut line).unwrap();
        assert!(line.contains("\"frame\":3"));
        assert!(line.contains("\"simTime\":0.05"));
        assert!(line.contains("\"id\":9"));
    }
}
