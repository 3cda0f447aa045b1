//! Navigation state: route classification, the active link, the
//! breadcrumb trail and its scroll behaviour, and the sidebar toggle.

pub mod breadcrumb;
pub mod route;
pub mod scroll;
pub mod sidebar;
pub mod sync;

pub use breadcrumb::{Breadcrumb, Crumb, CrumbIcon};
pub use route::Route;
pub use scroll::ScrollTracker;
pub use sidebar::{SidebarState, MOBILE_BREAKPOINT};
pub use sync::{internal_path, NavigationSettings, NavigationSync, SyncReport};
