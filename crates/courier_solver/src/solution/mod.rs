pub mod efficiency;
pub mod report;
pub mod route;
pub mod vrp_solution;

pub use efficiency::EfficiencyScores;
pub use report::ScheduleReport;
pub use route::Route;
pub use vrp_solution::Solution;
