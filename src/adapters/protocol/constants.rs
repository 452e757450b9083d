/// ApiVersions API의 키 값
/// 클라이언트가 브로커가 지원하는 API 버전을 조회할 때 사용함
pub const API_VERSIONS_KEY: i16 = 18;
pub const API_VERSIONS_MIN_VERSION: i16 = 0;
pub const API_VERSIONS_MAX_VERSION: i16 = 4;

/// ApiVersions v3부터 flexible 인코딩 (compact array, tagged fields)
pub const API_VERSIONS_FLEXIBLE_VERSION: i16 = 3;

/// DescribeTopicPartitions API의 키 값
pub const DESCRIBE_TOPIC_PARTITIONS_KEY: i16 = 75;

/// DescribeTopicPartitions API는 버전 0만 지원
pub const DESCRIBE_TOPIC_PARTITIONS_MIN_VERSION: i16 = 0;
pub const DESCRIBE_TOPIC_PARTITIONS_MAX_VERSION: i16 = 0;

/// 요청 헤더는 v2만 지원 (헤더 버전은 와이어에서 읽지 않음)
pub const REQUEST_HEADER_VERSION: i16 = 2;

/// 에러 코드
pub const NONE: i16 = 0;
pub const UNKNOWN_TOPIC_OR_PARTITION: i16 = 3;
pub const UNSUPPORTED_VERSION: i16 = 35;

/// nullable struct 마커: -1이면 null
pub const NULL_MARKER: i8 = -1;
pub const PRESENT_MARKER: i8 = 1;

/// socket.request.max.bytes 기본값 (100 MiB)
pub const DEFAULT_MAX_FRAME_SIZE: usize = 100 * 1024 * 1024;

/// max.request.partition.size.limit 기본값
pub const DEFAULT_MAX_PARTITIONS_PER_RESPONSE: i32 = 2000;
