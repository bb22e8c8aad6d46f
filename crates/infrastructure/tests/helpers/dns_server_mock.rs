use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

/// How the mock server answers every A query it receives.
#[derive(Debug, Clone, Copy)]
pub enum MockAnswer {
    Address(Ipv4Addr),
    NxDomain,
    ServFail,
    /// NOERROR with an empty answer section
    NoData,
    /// Never replies
    Silent,
    /// UDP replies are truncated; the full answer is served over TCP
    TruncatedThenTcp(Ipv4Addr),
}

pub struct MockDnsServer {
    addr: SocketAddr,
    queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(answer: MockAnswer) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;

        let tcp = match answer {
            MockAnswer::TruncatedThenTcp(_) => Some(TcpListener::bind(addr).await?),
            _ => None,
        };

        let queries = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&queries);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            counter.fetch_add(1, Ordering::SeqCst);
                            if let Some(response) = Self::build_udp_response(&buf[..len], answer) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                    Some(stream) = accept(&tcp) => {
                        tokio::spawn(Self::serve_tcp(stream, answer));
                    }
                }
            }
        });

        Ok(Self {
            addr,
            queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    async fn serve_tcp(mut stream: tokio::net::TcpStream, answer: MockAnswer) {
        let mut len_buf = [0u8; 2];
        if stream.read_exact(&mut len_buf).await.is_err() {
            return;
        }
        let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
        if stream.read_exact(&mut query).await.is_err() {
            return;
        }

        let ip = match answer {
            MockAnswer::TruncatedThenTcp(ip) => ip,
            _ => return,
        };
        let response = build_response(&query, 0x81, 0x80, Some(ip));
        let _ = stream.write_all(&(response.len() as u16).to_be_bytes()).await;
        let _ = stream.write_all(&response).await;
    }

    fn build_udp_response(query: &[u8], answer: MockAnswer) -> Option<Vec<u8>> {
        if query.len() < 12 {
            return None;
        }

        match answer {
            MockAnswer::Address(ip) => Some(build_response(query, 0x81, 0x80, Some(ip))),
            MockAnswer::NxDomain => Some(build_response(query, 0x81, 0x83, None)),
            MockAnswer::ServFail => Some(build_response(query, 0x81, 0x82, None)),
            MockAnswer::NoData => Some(build_response(query, 0x81, 0x80, None)),
            MockAnswer::Silent => None,
            // TC bit set, no answers
            MockAnswer::TruncatedThenTcp(_) => Some(build_response(query, 0x83, 0x80, None)),
        }
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn accept(listener: &Option<TcpListener>) -> Option<tokio::net::TcpStream> {
    match listener {
        Some(listener) => listener.accept().await.ok().map(|(stream, _)| stream),
        None => std::future::pending().await,
    }
}

fn build_response(query: &[u8], flags_hi: u8, flags_lo: u8, ip: Option<Ipv4Addr>) -> Vec<u8> {
    let mut response = Vec::with_capacity(512);

    response.extend_from_slice(&query[0..2]);

    response.push(flags_hi);
    response.push(flags_lo);

    // QDCOUNT
    response.extend_from_slice(&query[4..6]);

    // ANCOUNT
    response.extend_from_slice(if ip.is_some() { &[0x00, 0x01] } else { &[0x00, 0x00] });

    // NSCOUNT, ARCOUNT
    response.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

    response.extend_from_slice(&query[12..]);

    if let Some(ip) = ip {
        response.extend_from_slice(&[
            0xc0, 0x0c, // name pointer to question
            0x00, 0x01, // type A
            0x00, 0x01, // class IN
            0x00, 0x00, 0x00, 0x3c, // TTL 60
            0x00, 0x04,
        ]);
        response.extend_from_slice(&ip.octets());
    }

    response
}
