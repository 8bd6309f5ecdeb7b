use deckpilot::{
    parse_deck, server, HtmlRenderer, LoadOptions, RemoteControl, RenderOptions, Reply,
    ServerConfig, Session,
};
use parking_lot::Mutex;
use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::thread;
use tiny_http::Method;

const DECK: &str = "# First\n\nHello\n\n# Second\n\n- a\n- b\n\n# Third\n???\nWrap up\n";

fn remote_control() -> RemoteControl {
    let options = LoadOptions {
        animate_list_items: true,
    };
    let deck = parse_deck(DECK, &options).expect("Failed to parse deck");

    let render = RenderOptions {
        controls: true,
        ..RenderOptions::default()
    };
    let renderer = HtmlRenderer::new(render.clone());
    let snapshot = renderer.output();
    let session = Arc::new(Mutex::new(Session::new(Arc::new(deck), Box::new(renderer))));
    RemoteControl::new(session, snapshot, render)
}

fn get(remote: &RemoteControl, url: &str) -> Reply {
    remote.route(&Method::Get, url)
}

fn post(remote: &RemoteControl, url: &str) -> Reply {
    remote.route(&Method::Post, url)
}

#[test]
fn test_routes_drive_the_session() {
    let remote = remote_control();

    let home = get(&remote, "/");
    assert_eq!(home.status, 200);
    assert!(home.body.contains("<h1>First</h1>"));

    let reply = post(&remote, "/next");
    assert_eq!(reply.status, 303);
    assert_eq!(reply.location.as_deref(), Some("/"));

    let home = get(&remote, "/");
    assert!(home.body.contains("<h1>Second</h1>"));
    assert!(!home.body.contains("<li>a</li>"));

    post(&remote, "/key/ArrowRight");
    assert!(get(&remote, "/").body.contains("<li>a</li>"));

    let reply = post(&remote, "/next?view=presenter");
    assert_eq!(reply.location.as_deref(), Some("/presenter"));

    let state = get(&remote, "/state");
    assert!(state.body.contains("slide=2/3"));
    assert!(state.body.contains("step=2/2"));

    let presenter = get(&remote, "/presenter");
    assert!(presenter.body.contains("Next: Third"));

    assert_eq!(post(&remote, "/jump/3").status, 303);
    let presenter = get(&remote, "/presenter");
    assert!(presenter.body.contains("Wrap up"));
    assert!(presenter.body.contains("End of deck"));
}

#[test]
fn test_rejected_routes_leave_state_alone() {
    let remote = remote_control();
    post(&remote, "/next");

    assert_eq!(post(&remote, "/jump/4").status, 400);
    assert_eq!(post(&remote, "/jump/zero").status, 400);
    assert_eq!(post(&remote, "/key/q").status, 400);
    assert_eq!(post(&remote, "/nowhere").status, 404);

    let session = remote.session();
    let session = session.lock();
    assert_eq!(session.state().position(), (1, 0));
}

#[test]
fn test_commands_require_post() {
    let remote = remote_control();

    for url in ["/next", "/last", "/jump/3", "/key/End", "/fullscreen", "/fullscreen/on"] {
        assert_eq!(get(&remote, url).status, 405, "{}", url);
    }
    assert_eq!(get(&remote, "/state").status, 200);
    assert_eq!(post(&remote, "/state").status, 200);

    let session = remote.session();
    let session = session.lock();
    assert_eq!(session.state().position(), (0, 0));
    assert!(!session.state().fullscreen);
}

#[test]
fn test_plus_key_is_not_space() {
    let remote = remote_control();

    assert_eq!(post(&remote, "/key/+").status, 400);
    assert_eq!(post(&remote, "/key/%20").status, 303);
    assert_eq!(remote.session().lock().state().position(), (1, 0));
}

#[test]
fn test_fullscreen_route_toggles_flag() {
    let remote = remote_control();

    post(&remote, "/fullscreen");
    assert!(get(&remote, "/").body.contains("<body class=\"fullscreen\">"));
    assert!(get(&remote, "/state").body.contains("fullscreen=true"));

    post(&remote, "/key/f");
    assert!(get(&remote, "/state").body.contains("fullscreen=false"));

    assert_eq!(post(&remote, "/fullscreen/on").status, 303);
    assert_eq!(post(&remote, "/fullscreen/on").status, 303);
    assert!(get(&remote, "/state").body.contains("fullscreen=true"));
    assert_eq!(post(&remote, "/fullscreen/sideways").status, 400);
    post(&remote, "/fullscreen/off");
    assert!(get(&remote, "/state").body.contains("fullscreen=false"));
}

#[test]
fn test_serves_over_http() {
    let remote = remote_control();
    let session = remote.session();

    let listener = server::bind(&ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
    })
    .expect("Failed to bind");
    let addr = listener
        .server_addr()
        .to_ip()
        .expect("Listener has an IP address");

    thread::spawn(move || remote.run(listener));

    let mut stream = TcpStream::connect(addr).expect("Failed to connect");
    stream
        .write_all(
            b"POST /last HTTP/1.1\r\nHost: localhost\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .expect("Failed to send request");

    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .expect("Failed to read response");

    assert!(response.starts_with("HTTP/1.1 303"), "{}", response);
    assert!(response.contains("Location: /"));
    assert_eq!(session.lock().state().position(), (2, 0));
}
