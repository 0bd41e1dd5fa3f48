pub mod headers;

pub use headers::api_headers_middleware;
