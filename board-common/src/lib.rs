pub mod athlete;
pub mod board;
pub mod config;
pub mod plates;
pub mod presenter;
pub mod regions;
pub mod snapshot;
pub mod widgets;

pub mod drawing_support {
    /// Longest countdown that fits in `m:ss`
    pub const MAX_STRINGABLE_SECS: u32 = 5999;
}
