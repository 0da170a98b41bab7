//! Command line and environment configuration.

use crate::geo::DEFAULT_SPEED_KMPH;
use crate::lifecycle::SystemConfig;
use std::fmt::{self, Display};
use std::net::SocketAddr;

#[derive(clap::Parser, Debug, Clone)]
#[clap(name = "kisansetu-tracking", about = "KisanSetu delivery tracking service")]
pub struct Arguments {
    #[clap(long, env, default_value = "0.0.0.0:5000")]
    pub bind_address: SocketAddr,

    /// Speed in km/h assumed by ETA requests that do not pass one.
    #[clap(long, env, default_value_t = DEFAULT_SPEED_KMPH)]
    pub default_speed_kmph: f64,

    /// Location updates buffered per room for its slowest watcher.
    #[clap(long, env, default_value = "64")]
    pub room_capacity: usize,

    /// Chat messages buffered for the slowest subscriber.
    #[clap(long, env, default_value = "256")]
    pub chat_capacity: usize,

    /// Requests queued per actor before callers wait.
    #[clap(long, env, default_value = "32")]
    pub actor_buffer: usize,

    /// `tracing` filter directive, e.g. `info` or `actor_framework=debug,info`.
    #[clap(long, env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,
}

impl Arguments {
    pub fn system_config(&self) -> SystemConfig {
        SystemConfig {
            actor_buffer: self.actor_buffer,
            room_capacity: self.room_capacity,
            chat_capacity: self.chat_capacity,
        }
    }
}

impl Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let Arguments {
            bind_address,
            default_speed_kmph,
            room_capacity,
            chat_capacity,
            actor_buffer,
            log_filter,
        } = self;

        writeln!(f, "bind_address: {}", bind_address)?;
        writeln!(f, "default_speed_kmph: {}", default_speed_kmph)?;
        writeln!(f, "room_capacity: {}", room_capacity)?;
        writeln!(f, "chat_capacity: {}", chat_capacity)?;
        writeln!(f, "actor_buffer: {}", actor_buffer)?;
        writeln!(f, "log_filter: {}", log_filter)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn flags_override_defaults() {
        let args = Arguments::try_parse_from([
            "kisansetu-tracking",
            "--bind-address",
            "127.0.0.1:8080",
            "--default-speed-kmph",
            "45",
            "--room-capacity",
            "8",
            "--log-filter",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.bind_address, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(args.default_speed_kmph, 45.0);
        assert_eq!(args.system_config().room_capacity, 8);
        assert_eq!(args.log_filter, "debug");
        assert!(args.to_string().contains("room_capacity: 8"));
    }

    #[test]
    fn bad_address_is_rejected() {
        assert!(Arguments::try_parse_from(["kisansetu-tracking", "--bind-address", "nowhere"]).is_err());
    }
}
