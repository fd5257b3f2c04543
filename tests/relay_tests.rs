use std::net::SocketAddr;
use std::sync::Arc;

use broadside::relay::{RelayRequest, RELAY_PEER_LEFT};
use broadside::transport::frame::{read_frame, write_frame};
use broadside::{
    lookup_match, send_deferred, serve, MatchRegistry, Message, NetConfig, PeerGone, Status,
    TcpTransport, Transport,
};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{sleep, timeout, Duration};

async fn start_relay() -> anyhow::Result<(SocketAddr, Arc<MatchRegistry>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let registry = Arc::new(MatchRegistry::new());
    tokio::spawn(serve(listener, registry.clone(), NetConfig::default()));
    Ok((addr, registry))
}

async fn connect(addr: SocketAddr, game_id: &str) -> anyhow::Result<TcpTransport> {
    let transport = TcpTransport::connect(addr, game_id, NetConfig::default()).await?;
    for _ in 0..50 {
        if transport.is_ready() {
            return Ok(transport);
        }
        sleep(Duration::from_millis(10)).await;
    }
    Err(anyhow::anyhow!("relay never acknowledged"))
}

async fn wait_until_gone(addr: SocketAddr, game_id: &str) -> anyhow::Result<bool> {
    for _ in 0..100 {
        if !lookup_match(addr, game_id, NetConfig::default()).await? {
            return Ok(true);
        }
        sleep(Duration::from_millis(10)).await;
    }
    Ok(false)
}

#[tokio::test(flavor = "multi_thread")]
async fn frames_reach_every_connection_of_the_match() -> anyhow::Result<()> {
    let (addr, _) = start_relay().await?;
    let mut a = connect(addr, "g1").await?;
    let mut b = connect(addr, "g1").await?;

    let join = Message::new(Status::Join, "alice", "g1");
    a.send(join.clone()).await?;
    assert_eq!(timeout(Duration::from_secs(2), b.recv()).await??, join);
    // The sender receives its own frame too.
    assert_eq!(timeout(Duration::from_secs(2), a.recv()).await??, join);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn matches_are_isolated() -> anyhow::Result<()> {
    let (addr, _) = start_relay().await?;
    let mut a = connect(addr, "g1").await?;
    let mut other = connect(addr, "g2").await?;

    a.send(Message::new(Status::Join, "alice", "g1")).await?;
    assert!(timeout(Duration::from_millis(200), other.recv()).await.is_err());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn lookup_follows_the_match_lifetime() -> anyhow::Result<()> {
    let (addr, registry) = start_relay().await?;
    let config = NetConfig::default();
    assert!(!lookup_match(addr, "g1", config).await?);

    let a = connect(addr, "g1").await?;
    let b = connect(addr, "g1").await?;
    assert!(lookup_match(addr, "g1", config).await?);
    assert_eq!(registry.connection_count("g1").await, 2);

    drop(a);
    sleep(Duration::from_millis(50)).await;
    assert!(lookup_match(addr, "g1", config).await?);

    drop(b);
    assert!(wait_until_gone(addr, "g1").await?);
    assert_eq!(registry.match_count().await, 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn send_before_the_ack_is_deferred() -> anyhow::Result<()> {
    let (addr, _) = start_relay().await?;
    let mut b = connect(addr, "g1").await?;
    let mut a = TcpTransport::connect(addr, "g1", NetConfig::default()).await?;
    let join = Message::new(Status::Join, "alice", "g1");
    send_deferred(&mut a, join.clone(), Duration::from_millis(200)).await?;
    assert_eq!(timeout(Duration::from_secs(2), b.recv()).await??, join);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_frames_are_skipped_by_the_client() -> anyhow::Result<()> {
    let (addr, _) = start_relay().await?;
    let mut b = connect(addr, "g1").await?;

    let config = NetConfig::default();
    let mut raw = TcpStream::connect(addr).await?;
    let request = RelayRequest::Connect { game_id: "g1".into() }.to_string();
    write_frame(&mut raw, &request, config.max_frame_size).await?;
    assert_eq!(read_frame(&mut raw, config.max_frame_size).await?, "OK");
    write_frame(&mut raw, "{not json", config.max_frame_size).await?;
    let join = Message::new(Status::Join, "mallory", "g1");
    write_frame(&mut raw, &join.to_json()?, config.max_frame_size).await?;

    assert_eq!(timeout(Duration::from_secs(2), b.recv()).await??, join);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_first_frame_closes_the_connection() -> anyhow::Result<()> {
    let (addr, registry) = start_relay().await?;
    let config = NetConfig::default();
    let mut raw = TcpStream::connect(addr).await?;
    write_frame(&mut raw, "HELLO there", config.max_frame_size).await?;
    assert!(timeout(Duration::from_secs(2), read_frame(&mut raw, config.max_frame_size))
        .await?
        .is_err());
    assert_eq!(registry.match_count().await, 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn departure_is_announced_to_the_rest_of_the_match() -> anyhow::Result<()> {
    let (addr, _) = start_relay().await?;
    let config = NetConfig::default();
    let mut raw = TcpStream::connect(addr).await?;
    let request = RelayRequest::Connect { game_id: "g1".into() }.to_string();
    write_frame(&mut raw, &request, config.max_frame_size).await?;
    assert_eq!(read_frame(&mut raw, config.max_frame_size).await?, "OK");

    let b = connect(addr, "g1").await?;
    let mut other = connect(addr, "g2").await?;
    drop(b);

    let notice = timeout(Duration::from_secs(2), read_frame(&mut raw, config.max_frame_size));
    assert_eq!(notice.await??, RELAY_PEER_LEFT);
    assert!(timeout(Duration::from_millis(200), other.recv()).await.is_err());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn departure_surfaces_as_peer_gone() -> anyhow::Result<()> {
    let (addr, _) = start_relay().await?;
    let mut a = connect(addr, "g1").await?;
    let b = connect(addr, "g1").await?;
    drop(b);

    let err = match timeout(Duration::from_secs(2), a.recv()).await? {
        Ok(msg) => return Err(anyhow::anyhow!("unexpected {:?}", msg)),
        Err(e) => e,
    };
    assert_eq!(err.downcast_ref::<PeerGone>(), Some(&PeerGone));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn shut_down_client_refuses_traffic() -> anyhow::Result<()> {
    let (addr, _) = start_relay().await?;
    let mut a = connect(addr, "g1").await?;
    let mut b = connect(addr, "g1").await?;

    a.shutdown();
    assert!(!a.is_ready());
    assert!(a.send(Message::new(Status::Join, "alice", "g1")).await.is_err());
    assert!(timeout(Duration::from_secs(2), a.recv()).await?.is_err());

    b.send(Message::new(Status::Join, "bob", "g1")).await?;
    assert!(timeout(Duration::from_secs(2), b.recv()).await?.is_ok());
    Ok(())
}
