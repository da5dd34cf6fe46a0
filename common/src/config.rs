// Protocol-level constants shared by every member crate

// Minimum UCP protocol version a remote node must speak to be synced from
pub const MIN_UCP_VERSION: u32 = 2;

// Version stamped into transaction documents unless configured otherwise
pub const DEFAULT_DOCUMENTS_VERSION: u32 = 1;
