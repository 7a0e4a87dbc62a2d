use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult};

/* Connection handling for a single Redis database.
 * A RedisStore only holds the client; a connection is opened per operation,
 * so constructing one never touches the network.
 */

#[derive(thiserror::Error, Debug)]
pub enum DBError {
    #[error("Invalid Redis URL: {0}")]
    InvalidUrl(RedisError),
    #[error("Failed to connect to Redis: {0}")]
    ConnectionFailed(RedisError),
}

#[derive(Clone, Debug)]
pub struct RedisStore {
    client: Client,
}

impl RedisStore {
    pub fn open(url: &str) -> Result<RedisStore, DBError> {
        let client = Client::open(url).map_err(DBError::InvalidUrl)?;
        Ok(RedisStore { client })
    }

    pub async fn connect(&self) -> Result<MultiplexedConnection, DBError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(DBError::ConnectionFailed)
    }
}

// Round-trips a throwaway key, confirms the database is reachable and writable.
pub async fn test_redis_connection(con: &mut MultiplexedConnection) -> RedisResult<bool> {
    let _: () = con.set("growshop:ping", 42).await?;
    let res: i32 = con.get("growshop:ping").await?;
    let _: () = con.del("growshop:ping").await?;

    Ok(res == 42)
}
