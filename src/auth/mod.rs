pub mod forms;
pub mod session;
pub mod validate;

pub use forms::{AuthForms, AuthOutcome, LoginForm, RegisterForm};
pub use session::{Session, load_session, logout};
