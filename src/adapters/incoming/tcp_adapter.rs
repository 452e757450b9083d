use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::adapters::protocol::framer::{read_frame, write_frame};
use crate::adapters::protocol::KafkaProtocolParser;
use crate::application::ApplicationError;
use crate::ports::incoming::message_handler::MessageHandler;
use crate::Result;

pub struct TcpAdapter {
    listener: TcpListener,
    message_handler: Arc<dyn MessageHandler>,
    protocol_parser: KafkaProtocolParser,
    max_frame_size: usize,
}

impl TcpAdapter {
    pub async fn new(
        addr: &str,
        message_handler: Arc<dyn MessageHandler>,
        protocol_parser: KafkaProtocolParser,
        max_frame_size: usize,
    ) -> Result<Self> {
        let listener = TcpListener::bind(addr).await.map_err(ApplicationError::Io)?;
        Ok(Self {
            listener,
            message_handler,
            protocol_parser,
            max_frame_size,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// 연결마다 독립된 태스크를 띄움. 태스크 간 공유 상태 없음
    pub async fn run(&self) -> Result<()> {
        info!(addr = %self.local_addr()?, "server listening");

        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let message_handler = Arc::clone(&self.message_handler);
                    let protocol_parser = self.protocol_parser.clone();
                    let max_frame_size = self.max_frame_size;

                    tokio::spawn(
                        async move {
                            debug!("accepted connection");
                            if let Err(e) = handle_connection(
                                stream,
                                message_handler,
                                protocol_parser,
                                max_frame_size,
                            )
                            .await
                            {
                                error!(error = %e, "connection closed with error");
                            }
                        }
                        .instrument(info_span!("connection", peer = %peer)),
                    );
                }
                Err(e) => error!(error = %e, "accept failed"),
            }
        }
    }
}

/// 상대가 닫을 때까지 연결 하나를 처리함
///
/// 요청은 하나씩 순서대로 처리하므로 응답도 요청 순서로 나감.
/// 바디 파싱에 실패한 요청은 버리고 다음 프레임으로 넘어가며 그 외 에러는 연결을 끝냄
pub async fn handle_connection<S>(
    mut stream: S,
    message_handler: Arc<dyn MessageHandler>,
    protocol_parser: KafkaProtocolParser,
    max_frame_size: usize,
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    loop {
        // 1. 프레임 하나를 정확히 읽음
        let Some(frame) = read_frame(&mut stream, max_frame_size).await? else {
            debug!("client closed connection");
            return Ok(());
        };

        // 2. 프로토콜 파싱
        let request = match protocol_parser.parse_request(frame) {
            Ok(request) => request,
            Err(ApplicationError::MalformedBody {
                api_key,
                correlation_id,
                source,
            }) => {
                warn!(api_key, correlation_id, error = %source, "dropping malformed request");
                continue;
            }
            Err(e) => return Err(e),
        };

        // 3. 비즈니스 로직 처리
        let response = message_handler.handle_request(request).await?;

        // 4. 응답 인코딩 및 전송
        let encoded = protocol_parser.encode_response(&response)?;
        write_frame(&mut stream, &encoded).await?;
    }
}
