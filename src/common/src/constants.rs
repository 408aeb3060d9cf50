/// Vendor ingestion domain. The destination hostname is a subdomain of this,
/// e.g. `acme.alooma.io`.
pub const VENDOR_TRACK_DOMAIN: &str = "alooma.io";

pub const SETTING_TOKEN: &str = "token";
pub const SETTING_HOSTNAME: &str = "hostname";

pub const DEFAULT_DELIVERY_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_MAX_IN_FLIGHT: usize = 16;
