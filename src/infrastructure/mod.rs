// Infrastructure layer - config, wire mapping, dumps, streaming transport
pub mod config;
pub mod dump_source;
pub mod ndjson_stream;
pub mod record_mapper;
