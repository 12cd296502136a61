//! UBL core: ban-list parsing and the pure host-side state machine.
mod cycle;
mod effect;
mod list;
mod msg;
mod state;
mod update;
mod view_model;

pub use cycle::{CycleOutcome, CycleSummary, PayloadSource};
pub use effect::Effect;
pub use list::{parse_payload, ParseError, ParsedList};
pub use msg::Msg;
pub use state::BanListState;
pub use update::update;
pub use view_model::BanListView;
