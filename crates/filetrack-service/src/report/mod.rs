//! Read-only reporting for the dashboard.

pub mod dashboard;

pub use dashboard::{
    DashboardStats, DepartmentBreakdown, DepartmentForwardCounts, ForwardingStats, PriorityCount,
    ReportService, StatusCount, UserStats,
};
