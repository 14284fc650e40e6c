use parking_lot::Mutex;
use redis::aio::ConnectionLike;
use redis::{Arg, Cmd, Pipeline, RedisError, RedisFuture, RedisResult, Value};
use std::collections::BTreeMap;
use std::io;
use std::sync::Arc;

/// An in-process stand-in for a Redis server.
///
/// Understands the handful of string commands the URL store issues (`PING`,
/// `GET`, `SET`, `INCR`, `INCRBY` and `SCAN ... MATCH prefix*`). Clones share
/// the same keyspace, so several stores built from one fake behave like
/// several clients of one server.
///
/// [`FakeRedis::set_available`] simulates an outage: while unavailable every
/// command fails with a connection-refused I/O error.
#[derive(Clone, Default)]
pub struct FakeRedis {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    data: BTreeMap<String, String>,
    down: bool,
}

impl FakeRedis {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `value` under `key`, bypassing the command path.
    pub fn insert(&self, key: &str, value: &str) {
        self.state
            .lock()
            .data
            .insert(key.to_string(), value.to_string());
    }

    /// Reads the raw string stored under `key`.
    pub fn value(&self, key: &str) -> Option<String> {
        self.state.lock().data.get(key).cloned()
    }

    /// All keys currently stored, in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.state.lock().data.keys().cloned().collect()
    }

    pub fn set_available(&self, available: bool) {
        self.state.lock().down = !available;
    }

    fn execute(&self, cmd: &Cmd) -> RedisResult<Value> {
        let mut args = cmd.args_iter().filter_map(|arg| match arg {
            Arg::Simple(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
            Arg::Cursor | _ => None,
        });

        let mut state = self.state.lock();
        if state.down {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "fake redis is down").into());
        }

        let name = args.next().unwrap_or_default().to_ascii_uppercase();
        let args: Vec<String> = args.collect();

        match (name.as_str(), args.as_slice()) {
            ("PING", []) => Ok(Value::SimpleString("PONG".to_string())),
            ("GET", [key]) => Ok(state
                .data
                .get(key)
                .map_or(Value::Nil, |v| Value::BulkString(v.as_bytes().to_vec()))),
            ("SET", [key, value]) => {
                state.data.insert(key.clone(), value.clone());
                Ok(Value::Okay)
            }
            ("INCR", [key]) => state.incr_by(key, "1"),
            ("INCRBY", [key, delta]) => state.incr_by(key, delta),
            ("SCAN", [cursor, rest @ ..]) => state.scan(cursor, rest),
            _ => Err(unsupported(&name)),
        }
    }
}

impl State {
    fn incr_by(&mut self, key: &str, delta: &str) -> RedisResult<Value> {
        let delta: i64 = delta.parse().map_err(|_| unsupported("INCRBY delta"))?;
        let current: i64 = match self.data.get(key) {
            Some(v) => v.parse().map_err(|_| unsupported("INCR on a non-integer"))?,
            None => 0,
        };
        let next = current
            .checked_add(delta)
            .ok_or_else(|| unsupported("INCR overflow"))?;

        self.data.insert(key.to_string(), next.to_string());
        Ok(Value::Int(next))
    }

    /// The cursor is an offset into the sorted key list.
    fn scan(&self, cursor: &str, options: &[String]) -> RedisResult<Value> {
        let start: usize = cursor.parse().map_err(|_| unsupported("SCAN cursor"))?;

        let mut pattern = None;
        let mut count = 10;
        for pair in options.chunks(2) {
            match pair {
                [flag, value] if flag.eq_ignore_ascii_case("MATCH") => pattern = Some(value.as_str()),
                [flag, value] if flag.eq_ignore_ascii_case("COUNT") => {
                    count = value.parse().map_err(|_| unsupported("SCAN COUNT"))?;
                }
                _ => return Err(unsupported("SCAN option")),
            }
        }

        let end = (start + count).min(self.data.len());
        let keys = self
            .data
            .keys()
            .skip(start)
            .take(end.saturating_sub(start))
            .filter(|key| pattern.is_none_or(|p| glob_matches(p, key)))
            .map(|key| Value::BulkString(key.as_bytes().to_vec()))
            .collect();

        let next = if end >= self.data.len() { 0 } else { end };
        Ok(Value::Array(vec![
            Value::BulkString(next.to_string().into_bytes()),
            Value::Array(keys),
        ]))
    }
}

/// Supports exact patterns and a single trailing `*`.
fn glob_matches(pattern: &str, key: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => key.starts_with(prefix),
        None => pattern == key,
    }
}

fn unsupported(what: &str) -> RedisError {
    io::Error::new(io::ErrorKind::Unsupported, format!("fake redis: unsupported {what}")).into()
}

impl ConnectionLike for FakeRedis {
    fn req_packed_command<'a>(&'a mut self, cmd: &'a Cmd) -> RedisFuture<'a, Value> {
        let result = self.execute(cmd);
        Box::pin(std::future::ready(result))
    }

    fn req_packed_commands<'a>(
        &'a mut self,
        _cmd: &'a Pipeline,
        _offset: usize,
        _count: usize,
    ) -> RedisFuture<'a, Vec<Value>> {
        Box::pin(std::future::ready(Err(unsupported("pipeline"))))
    }

    fn get_db(&self) -> i64 {
        0
    }
}
