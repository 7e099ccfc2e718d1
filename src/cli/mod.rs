mod round_id;
mod session;
mod state;

pub use round_id::{round_span, RoundId};
pub use session::{parse_show_list, Session, MIN_LIKED_SHOWS};
pub use state::AppState;
