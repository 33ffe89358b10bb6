//! RTSP status codes (RFC 2326 §7.1.1, §11).

pub const CONTINUE: u16 = 100;
pub const OK: u16 = 200;
pub const CREATED: u16 = 201;
pub const LOW_ON_STORAGE_SPACE: u16 = 250;
pub const MULTIPLE_CHOICES: u16 = 300;
pub const MOVED_PERMANENTLY: u16 = 301;
pub const MOVED_TEMPORARILY: u16 = 302;
pub const SEE_OTHER: u16 = 303;
pub const NOT_MODIFIED: u16 = 304;
pub const USE_PROXY: u16 = 305;
pub const BAD_REQUEST: u16 = 400;
pub const UNAUTHORIZED: u16 = 401;
pub const PAYMENT_REQUIRED: u16 = 402;
pub const FORBIDDEN: u16 = 403;
pub const NOT_FOUND: u16 = 404;
pub const METHOD_NOT_ALLOWED: u16 = 405;
pub const NOT_ACCEPTABLE: u16 = 406;
pub const PROXY_AUTHENTICATION_REQUIRED: u16 = 407;
pub const REQUEST_TIMEOUT: u16 = 408;
pub const GONE: u16 = 410;
pub const LENGTH_REQUIRED: u16 = 411;
pub const PRECONDITION_FAILED: u16 = 412;
pub const REQUEST_ENTITY_TOO_LARGE: u16 = 413;
pub const REQUEST_URI_TOO_LONG: u16 = 414;
pub const UNSUPPORTED_MEDIA_TYPE: u16 = 415;
pub const PARAMETER_NOT_UNDERSTOOD: u16 = 451;
pub const CONFERENCE_NOT_FOUND: u16 = 452;
pub const NOT_ENOUGH_BANDWIDTH: u16 = 453;
pub const SESSION_NOT_FOUND: u16 = 454;
pub const METHOD_NOT_VALID_IN_THIS_STATE: u16 = 455;
pub const HEADER_FIELD_NOT_VALID: u16 = 456;
pub const INVALID_RANGE: u16 = 457;
pub const PARAMETER_IS_READ_ONLY: u16 = 458;
pub const AGGREGATE_OPERATION_NOT_ALLOWED: u16 = 459;
pub const ONLY_AGGREGATE_OPERATION_ALLOWED: u16 = 460;
pub const UNSUPPORTED_TRANSPORT: u16 = 461;
pub const DESTINATION_UNREACHABLE: u16 = 462;
pub const INTERNAL_SERVER_ERROR: u16 = 500;
pub const NOT_IMPLEMENTED: u16 = 501;
pub const BAD_GATEWAY: u16 = 502;
pub const SERVICE_UNAVAILABLE: u16 = 503;
pub const GATEWAY_TIMEOUT: u16 = 504;
pub const RTSP_VERSION_NOT_SUPPORTED: u16 = 505;
pub const OPTION_NOT_SUPPORTED: u16 = 551;

/// Canonical reason phrase for a status code, `None` if unknown.
pub fn reason_phrase(code: u16) -> Option<&'static str> {
    let phrase = match code {
        CONTINUE => "Continue",
        OK => "OK",
        CREATED => "Created",
        LOW_ON_STORAGE_SPACE => "Low on Storage Space",
        MULTIPLE_CHOICES => "Multiple Choices",
        MOVED_PERMANENTLY => "Moved Permanently",
        MOVED_TEMPORARILY => "Moved Temporarily",
        SEE_OTHER => "See Other",
        NOT_MODIFIED => "Not Modified",
        USE_PROXY => "Use Proxy",
        BAD_REQUEST => "Bad Request",
        UNAUTHORIZED => "Unauthorized",
        PAYMENT_REQUIRED => "Payment Required",
        FORBIDDEN => "Forbidden",
        NOT_FOUND => "Not Found",
        METHOD_NOT_ALLOWED => "Method Not Allowed",
        NOT_ACCEPTABLE => "Not Acceptable",
        PROXY_AUTHENTICATION_REQUIRED => "Proxy Authentication Required",
        REQUEST_TIMEOUT => "Request Time-out",
        GONE => "Gone",
        LENGTH_REQUIRED => "Length Required",
        PRECONDITION_FAILED => "Precondition Failed",
        REQUEST_ENTITY_TOO_LARGE => "Request Entity Too Large",
        REQUEST_URI_TOO_LONG => "Request-URI Too Large",
        UNSUPPORTED_MEDIA_TYPE => "Unsupported Media Type",
        PARAMETER_NOT_UNDERSTOOD => "Parameter Not Understood",
        CONFERENCE_NOT_FOUND => "Conference Not Found",
        NOT_ENOUGH_BANDWIDTH => "Not Enough Bandwidth",
        SESSION_NOT_FOUND => "Session Not Found",
        METHOD_NOT_VALID_IN_THIS_STATE => "Method Not Valid in This State",
        HEADER_FIELD_NOT_VALID => "Header Field Not Valid for Resource",
        INVALID_RANGE => "Invalid Range",
        PARAMETER_IS_READ_ONLY => "Parameter Is Read-Only",
        AGGREGATE_OPERATION_NOT_ALLOWED => "Aggregate operation not allowed",
        ONLY_AGGREGATE_OPERATION_ALLOWED => "Only aggregate operation allowed",
        UNSUPPORTED_TRANSPORT => "Unsupported transport",
        DESTINATION_UNREACHABLE => "Destination unreachable",
        INTERNAL_SERVER_ERROR => "Internal Server Error",
        NOT_IMPLEMENTED => "Not Implemented",
        BAD_GATEWAY => "Bad Gateway",
        SERVICE_UNAVAILABLE => "Service Unavailable",
        GATEWAY_TIMEOUT => "Gateway Time-out",
        RTSP_VERSION_NOT_SUPPORTED => "RTSP Version not supported",
        OPTION_NOT_SUPPORTED => "Option not supported",
        _ => return None,
    };
    Some(phrase)
}
