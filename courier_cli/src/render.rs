use comfy_table::{Cell, Table, presets::UTF8_FULL};

use courier_solver::solution::ScheduleReport;

pub fn print_report(report: &ScheduleReport) {
    let mut summary = Table::new();
    summary.load_preset(UTF8_FULL).set_header(vec![
        "Initialiser",
        "Optimiser",
        "Scheduled",
        "Unassigned",
        "Vehicles",
        "Distance (mi)",
        "Duration (h)",
        "Efficiency",
    ]);
    summary.add_row(vec![
        Cell::new(format!("{:?}", report.initialiser)),
        Cell::new(format!("{:?}", report.optimiser)),
        Cell::new(report.scheduled_packages),
        Cell::new(report.unassigned_packages),
        Cell::new(format!(
            "{}/{}",
            report.vehicles_used, report.vehicles_available
        )),
        Cell::new(format!("{:.1}", report.total_distance_miles)),
        Cell::new(format!("{:.2}", report.total_duration_hours)),
        Cell::new(format!("{:.2}", report.overall_efficiency)),
    ]);
    for other in &report.other_solutions {
        summary.add_row(vec![
            Cell::new(format!("{:?}", other.initialiser)),
            Cell::new(format!("{:?}", other.optimiser)),
            Cell::new("-"),
            Cell::new("-"),
            Cell::new("-"),
            Cell::new("-"),
            Cell::new("-"),
            Cell::new(format!("{:.2}", other.overall_efficiency)),
        ]);
    }
    println!("{summary}");

    let mut routes = Table::new();
    routes.load_preset(UTF8_FULL).set_header(vec![
        "Vehicle",
        "Stops",
        "Load (wt/vol)",
        "Distance (mi)",
        "Duration (min)",
        "Travel data",
    ]);
    for route in &report.routes {
        routes.add_row(vec![
            Cell::new(&route.registration),
            Cell::new(route.stops.len()),
            Cell::new(format!("{:.1}/{:.1}", route.load_weight, route.load_volume)),
            Cell::new(format!("{:.1}", route.distance_miles)),
            Cell::new(format!("{:.0}", route.duration_mins)),
            Cell::new(if route.travel_reconciled {
                "actual"
            } else {
                "estimated"
            }),
        ]);
    }
    println!("{routes}");
}
