//! Crate-level tunables and the injectable wall clock (§5, §6 ambient
//! interfaces). None of this is per-`Client` state — that lives on
//! `Client` itself — this is configuration the core needs regardless of
//! which client is being served.

/// Wall-clock seconds-since-epoch, injectable so grant engines and tests
/// can run against a deterministic `now` (§5).
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// The default `Clock`, backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// A clock that always returns a fixed instant, for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}

/// Crate-level configuration, loadable from the environment the way a
/// host application loads its own `Config` — even though this core never
/// opens a socket itself.
#[derive(Debug, Clone)]
pub struct Config {
    /// Fallback access-token TTL (seconds) used only when wiring a demo
    /// or test `Client` that doesn't specify its own.
    pub default_access_token_ttl: i64,
    /// Fallback authorization-code TTL (seconds).
    pub default_authorization_code_ttl: i64,
    /// Fallback refresh-token TTL (seconds).
    pub default_refresh_token_ttl: i64,
    /// bcrypt cost used when the core is asked to hash a client secret.
    pub bcrypt_cost: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_access_token_ttl: 3600,
            default_authorization_code_ttl: 60,
            default_refresh_token_ttl: 604_800,
            bcrypt_cost: crate::utils::secret::BCRYPT_COST,
        }
    }
}

impl Config {
    /// Load configuration from the environment, falling back to defaults
    /// for anything unset.
    pub fn from_env() -> anyhow::Result<Self> {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        Ok(Self {
            default_access_token_ttl: env_or("DEFAULT_ACCESS_TOKEN_TTL", defaults.default_access_token_ttl)?,
            default_authorization_code_ttl: env_or(
                "DEFAULT_AUTHORIZATION_CODE_TTL",
                defaults.default_authorization_code_ttl,
            )?,
            default_refresh_token_ttl: env_or(
                "DEFAULT_REFRESH_TOKEN_TTL",
                defaults.default_refresh_token_ttl,
            )?,
            bcrypt_cost: env_or("BCRYPT_COST", defaults.bcrypt_cost)?,
        })
    }

    /// Install a `tracing` subscriber reading `RUST_LOG`, falling back to
    /// `info`. Intended for hosts/demos that haven't set up their own.
    pub fn init_tracing() {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "info".into()),
            )
            .with(tracing_subscriber::fmt::layer())
            .try_init();
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {key}: {e}")),
        Err(_) => Ok(default),
    }
}
