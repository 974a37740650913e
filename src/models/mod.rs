mod lead;
mod search_template;
mod user;

pub use lead::{Lead, LeadStatus, ScoreBand};
pub use search_template::{SearchCriteria, SearchTemplate};
pub use user::{CompanyProfile, NewUser, User};
