//! Shared helpers used by every crate in the workspace: logging setup,
//! runtime directory checks and the small list utilities behind the admin
//! tables (sorting, filtering, slugs).

pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }
}
