pub mod handlers;
pub mod middleware;
pub mod model;
pub mod session;
pub mod supabase;


pub use middleware::*;
pub use model::*;
pub use session::*;
pub use supabase::SupabaseSessionProvider;
