mod fake;
mod server;

pub use {fake::FakeRedis, server::RedisServer};
