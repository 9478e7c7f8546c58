//! Constants Module - Single Source of Truth
//!
//! Defaults, realm expression names and the tokens of the realm's value
//! encoding all live here.

// ============================================
// APPLICATION CONSTANTS
// ============================================

pub const APP_NAME: &str = "GnoBountyGateway";

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for RPC requests
pub const USER_AGENT: &str = concat!("GnoBountyGateway/", env!("CARGO_PKG_VERSION"));

// ============================================
// DEFAULT CONFIGURATION
// ============================================

pub const DEFAULT_RPC_URL: &str = "https://rpc.gno.land:443";

pub const DEFAULT_REALM_PATH: &str = "gno.land/r/greg007/gnobounty_v2";

pub const DEFAULT_HOST: &str = "0.0.0.0";

pub const DEFAULT_PORT: u16 = 8080;

/// Default timeout for one RPC round trip (seconds)
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 10;

/// Extra attempts after a retryable transport failure
pub const DEFAULT_RPC_RETRIES: u32 = 1;

/// Delay before a retry, before jitter (milliseconds)
pub const RETRY_BASE_DELAY_MS: u64 = 250;

/// Jitter percentage applied to the retry delay
pub const RETRY_JITTER_PERCENT: u64 = 20;

// ============================================
// RPC / REALM
// ============================================

/// ABCI query path for read-only evaluation
pub const QEVAL_PATH: &str = "vm/qeval";

pub const EXPR_BOUNTY_COUNT: &str = "GetBountyCount()";
pub const EXPR_BOUNTY: &str = "GetBounty";
pub const EXPR_APPLICATIONS: &str = "GetApplicationsForBounty";
pub const EXPR_VALIDATORS: &str = "GetValidatorsForApplication";
pub const EXPR_LEADERBOARD: &str = "GetLeaderboard()";

// ============================================
// VALUE ENCODING
// ============================================

/// `slice[` opens a sequence
pub const SEQUENCE_MARKER: &str = "slice";

/// `struct{` opens a record
pub const RECORD_MARKER: &str = "struct";

pub const NIL_SENTINEL: &str = "nil";

pub const ADDRESS_PREFIX: &str = "g1";

/// Prefix plus 38 lowercase alphanumerics
pub const ADDRESS_LEN: usize = 40;

/// Type tag of the bounty amount field
pub const AMOUNT_KIND: &str = "int64";

pub const AMOUNT_FIELD_PREFIX: &str = "Amount:";

pub const BOOL_KIND: &str = "bool";

pub const CLAIMED_FIELD: &str = "IsClaimed:true";

/// Application status tags end with this type name (`<pkg>.ApplicationStatus`)
pub const STATUS_KIND_SUFFIX: &str = "ApplicationStatus";

/// ID, BountyID, Applicant, PRLink, AppliedAt, Status
pub const APPLICATION_MIN_FIELDS: usize = 6;

/// Address, BountiesCreated, BountiesApplied, ValidationsPerformed, Score
pub const LEADERBOARD_MIN_FIELDS: usize = 5;

// ============================================
// HTTP
// ============================================

pub const CORS_ALLOW_METHODS: &str = "GET, POST, OPTIONS, PUT, DELETE";

pub const CORS_ALLOW_HEADERS: &str = "Content-Type, Authorization";
