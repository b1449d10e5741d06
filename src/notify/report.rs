use crate::core::batch::DeliveryRequest;

/// Render a batch as the short plain-text report sent over chat channels.
///
/// One line per metric with the mean over the batch; metrics the host does
/// not expose show as `N/A` rather than being dropped from the message.
pub fn render_report(request: &DeliveryRequest) -> String {
    let batch = &request.batch;
    let meta = &request.meta;

    [
        format!("{} with {}", meta.hostname, meta.distro),
        format!("CPU: {}", percent(batch.mean("cpu"))),
        format!("RAM: {}", percent(batch.mean("ram"))),
        format!("GPU: {}", percent(batch.mean("gpu"))),
        format!("Thermal: {}", celsius(batch.mean("temp"))),
        format!(
            "{} samples in cycle {}",
            batch.sample_count(),
            request.cycle
        ),
    ]
    .join("\n")
}

fn percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}%"),
        None => "N/A".to_string(),
    }
}

fn celsius(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}°C"),
        None => "N/A".to_string(),
    }
}
