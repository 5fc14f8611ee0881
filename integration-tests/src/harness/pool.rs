use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PoolMode {
    Healthy = 0,
    /// Every request gets a 500.
    Failing = 1,
}

/// A tiny HTTP app instance that identifies itself in response headers.
pub struct MockPool {
    port: u16,
    mode: Arc<AtomicU8>,
}

impl MockPool {
    pub fn start(name: &'static str, release_id: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind mock pool");
        let port = listener.local_addr().unwrap().port();
        let mode = Arc::new(AtomicU8::new(PoolMode::Healthy as u8));

        thread::spawn({
            let mode = mode.clone();
            move || {
                for stream in listener.incoming() {
                    let Ok(stream) = stream else { continue };
                    let mode = mode.clone();
                    thread::spawn(move || handle(stream, name, release_id, &mode));
                }
            }
        });

        Self { port, mode }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn set_mode(&self, mode: PoolMode) {
        self.mode.store(mode as u8, Ordering::SeqCst);
    }
}

fn handle(stream: TcpStream, name: &str, release_id: &str, mode: &AtomicU8) {
    let mut reader = BufReader::new(stream);

    // Drain the request head; request bodies are not used by the tests.
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => return,
            Ok(_) if line == "\r\n" || line == "\n" => break,
            Ok(_) => {}
        }
    }

    let failing = mode.load(Ordering::SeqCst) == PoolMode::Failing as u8;
    let (status, body) = if failing {
        ("500 Internal Server Error", "fail")
    } else {
        ("200 OK", name)
    };

    let response = format!(
        "HTTP/1.1 {status}\r\n\
         X-App-Pool: {name}\r\n\
         X-Release-Id: {release_id}\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n\
         {body}",
        body.len()
    );
    let mut stream = reader.into_inner();
    let _ = stream.write_all(response.as_bytes());
}
