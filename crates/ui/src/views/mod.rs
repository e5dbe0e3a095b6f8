mod charts;
mod dashboard;
mod home;
mod material;
mod material_stats;
mod quiz;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use dashboard::DashboardView;
pub use home::HomeView;
pub use material::MaterialView;
pub use material_stats::MaterialStatsView;
pub use quiz::QuizView;
pub use state::{ViewError, ViewState, view_state_from_remote};
