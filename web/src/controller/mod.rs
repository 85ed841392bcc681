pub(crate) mod email_controller;
pub(crate) mod google_token_controller;
pub(crate) mod health_check_controller;
pub(crate) mod summarize_controller;
