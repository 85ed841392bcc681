use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default Julep API base URL used when `JULEP_BASE_URL` is not set.
pub const DEFAULT_JULEP_BASE_URL: &str = "https://api.julep.ai/api";

/// Default Google Calendar v3 API base URL used when `GOOGLE_CALENDAR_BASE_URL` is not set.
pub const DEFAULT_GOOGLE_CALENDAR_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Default MailerSend API base URL used when `MAILERSEND_BASE_URL` is not set.
pub const DEFAULT_MAILERSEND_BASE_URL: &str = "https://api.mailersend.com/v1";

/// Default Google tokeninfo endpoint used to verify Google ID tokens.
pub const DEFAULT_GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// A list of full CORS origin URLs that allowed to receive server responses.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "http://localhost:3000,https://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,

    /// The base URL of the Julep execution engine API.
    /// Override in tests to point at a mock server.
    #[arg(long, env, default_value = DEFAULT_JULEP_BASE_URL)]
    julep_base_url: String,

    /// The API key to use when calling the Julep API.
    #[arg(long, env)]
    julep_api_key: Option<String>,

    /// Name of the agent created at startup to run summarization tasks.
    #[arg(long, env, default_value = "Meeting Summarizer")]
    agent_name: String,

    /// Model the summarization agent runs on.
    #[arg(long, env, default_value = "gpt-4o")]
    agent_model: String,

    /// Short self-description given to the summarization agent.
    #[arg(
        long,
        env,
        default_value = "You summarize meetings and extract key action items."
    )]
    agent_about: String,

    /// Timeout in seconds applied to every outbound HTTP request.
    #[arg(long, env, default_value_t = 30)]
    pub http_timeout_secs: u64,

    /// Milliseconds to wait between two execution status queries.
    #[arg(long, env, default_value_t = 1000)]
    pub poll_interval_ms: u64,

    /// Seconds an execution may take before the request is failed with a timeout.
    #[arg(long, env, default_value_t = 300)]
    pub poll_timeout_secs: u64,

    /// Consecutive transport failures tolerated while polling an execution.
    #[arg(long, env, default_value_t = 3)]
    pub poll_max_transport_retries: u32,

    /// Maximum number of action items dispatched to connectors at the same time.
    #[arg(long, env, default_value_t = 4)]
    pub dispatch_concurrency: usize,

    /// Seconds a single calendar or notification call is awaited before it is
    /// reported as failed.
    #[arg(long, env, default_value_t = 10)]
    pub connector_timeout_secs: u64,

    /// Retries applied by the HTTP middleware to transient connector failures.
    #[arg(long, env, default_value_t = 1)]
    pub connector_max_retries: u32,

    /// The base URL of the Google Calendar API.
    #[arg(long, env, default_value = DEFAULT_GOOGLE_CALENDAR_BASE_URL)]
    google_calendar_base_url: String,

    /// OAuth access token with the calendar scope.
    #[arg(long, env)]
    google_calendar_access_token: Option<String>,

    /// Calendar that receives action item events.
    #[arg(long, env, default_value = "primary")]
    google_calendar_id: String,

    /// The base URL of the MailerSend API.
    /// Override in tests to point at a mock server.
    #[arg(long, env, default_value = DEFAULT_MAILERSEND_BASE_URL)]
    mailersend_base_url: String,

    /// The API key to use when calling the MailerSend API.
    #[arg(long, env)]
    mailersend_api_key: Option<String>,

    /// Sender address of action item notifications.
    #[arg(long, env, default_value = "summarizer@example.com")]
    notification_sender_email: String,

    /// Sender display name of action item notifications.
    #[arg(long, env, default_value = "Meeting Summarizer Bot")]
    notification_sender_name: String,

    /// Mail domain appended to the assignee name to form a recipient address.
    #[arg(long, env, default_value = "yourcompany.com")]
    recipient_email_domain: String,

    /// OAuth client ID that Google ID tokens must be issued for.
    #[arg(long, env)]
    google_client_id: Option<String>,

    /// The Google endpoint used to verify ID tokens.
    #[arg(long, env, default_value = DEFAULT_GOOGLE_TOKENINFO_URL)]
    google_tokeninfo_url: String,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 4000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    /// Returns the Julep API base URL.
    pub fn julep_base_url(&self) -> &str {
        &self.julep_base_url
    }

    /// Returns the Julep API key, if configured.
    pub fn julep_api_key(&self) -> Option<String> {
        self.julep_api_key.clone()
    }

    pub fn set_julep_base_url(mut self, base_url: String) -> Self {
        self.julep_base_url = base_url;
        self
    }

    pub fn set_julep_api_key(mut self, api_key: String) -> Self {
        self.julep_api_key = Some(api_key);
        self
    }

    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    pub fn agent_model(&self) -> &str {
        &self.agent_model
    }

    pub fn agent_about(&self) -> &str {
        &self.agent_about
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    pub fn connector_timeout(&self) -> Duration {
        Duration::from_secs(self.connector_timeout_secs)
    }

    /// Returns the Google Calendar API base URL.
    pub fn google_calendar_base_url(&self) -> &str {
        &self.google_calendar_base_url
    }

    /// Returns the Google Calendar access token, if configured.
    pub fn google_calendar_access_token(&self) -> Option<String> {
        self.google_calendar_access_token.clone()
    }

    pub fn google_calendar_id(&self) -> &str {
        &self.google_calendar_id
    }

    /// Returns the MailerSend API base URL.
    pub fn mailersend_base_url(&self) -> &str {
        &self.mailersend_base_url
    }

    /// Returns the MailerSend API key, if configured.
    pub fn mailersend_api_key(&self) -> Option<String> {
        self.mailersend_api_key.clone()
    }

    pub fn notification_sender_email(&self) -> &str {
        &self.notification_sender_email
    }

    pub fn notification_sender_name(&self) -> &str {
        &self.notification_sender_name
    }

    pub fn recipient_email_domain(&self) -> &str {
        &self.recipient_email_domain
    }

    /// Returns the Google OAuth client ID, if configured.
    pub fn google_client_id(&self) -> Option<String> {
        self.google_client_id.clone()
    }

    pub fn set_google_client_id(mut self, client_id: String) -> Self {
        self.google_client_id = Some(client_id);
        self
    }

    pub fn google_tokeninfo_url(&self) -> &str {
        &self.google_tokeninfo_url
    }

    pub fn set_google_tokeninfo_url(mut self, url: String) -> Self {
        self.google_tokeninfo_url = url;
        self
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env() == RustEnv::Production
    }
}
