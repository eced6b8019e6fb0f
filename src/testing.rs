//! Local HTTP fixtures shared by the unit and integration tests.
//!
//! Every helper panics on socket errors; they are only meant for tests.

use std::io::Read;
use std::net::{SocketAddr, TcpListener};

/// Serve `app` on an ephemeral localhost port from a background thread.
/// The listener is bound before returning, so requests can go out at once.
pub fn serve_in_background(app: axum::Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    listener
        .set_nonblocking(true)
        .expect("non-blocking test listener");
    let addr = listener.local_addr().expect("test listener address");

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("test runtime");
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).expect("tokio listener");
            axum::serve(listener, app).await.expect("test server");
        });
    });
    addr
}

/// An address nothing listens on.
pub fn refused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    listener.local_addr().expect("test listener address")
}

/// An address that accepts connections but never answers. Keep the
/// listener alive for as long as the address is used.
pub fn silent_addr() -> (SocketAddr, TcpListener) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    (listener.local_addr().expect("test listener address"), listener)
}

/// An address that accepts each connection, reads the request and hangs up
/// without writing a response.
pub fn hang_up_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("test listener address");

    std::thread::spawn(move || {
        for mut stream in listener.incoming().flatten() {
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
        }
    });
    addr
}
