//! Profile editing: basic fields, enhanced sections, visibility, status, and
//! username availability.

pub mod editor;
pub mod enhanced;
pub mod fence;
pub mod form;
pub mod status;
pub mod username_check;
pub mod visibility;

pub use editor::ProfileEditor;
pub use enhanced::{EnhancedEditor, SectionItem};
pub use fence::{RequestFence, RequestTicket};
pub use form::{FormEdit, FormErrors, ProfileForm};
pub use status::{StatusDraft, StatusExpiry, is_expired};
pub use username_check::{
    CheckerSettings, UsernameCheck, UsernameChecker, UsernameStatus,
};
pub use visibility::VisibilityController;
