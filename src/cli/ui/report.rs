//! Human-readable rendering of an `AnalysisReport`.

use std::fmt::Write;

use console::style;

use crate::types::{AnalysisReport, ExtensionAnalysis, InterfaceAnalysis};

pub fn render_text(report: &AnalysisReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", style(format!("Analysis of {}", report.root)).bold().underlined());
    let _ = writeln!(
        out,
        "  {} scanned, {} structured, {} skipped",
        report.files_scanned, report.files_structured, report.files_skipped
    );

    render_interfaces(&mut out, &report.interface_analysis);
    render_extensions(&mut out, &report.extension_analysis);
    out
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", style(title).bold());
    let _ = writeln!(out, "{}", "─".repeat(40));
}

fn render_interfaces(out: &mut String, analysis: &InterfaceAnalysis) {
    let stats = &analysis.stats;
    section(out, "Interfaces");
    let _ = writeln!(
        out,
        "  {} total, {} implemented, {} unimplemented",
        stats.total_interfaces, stats.implemented_interfaces, stats.unimplemented_interfaces
    );

    for iface in &analysis.interfaces {
        let _ = writeln!(
            out,
            "  {} {} ({} methods)",
            style(&iface.interface_name).cyan(),
            style(&iface.interface_file).dim(),
            iface.method_count
        );
        for imp in &iface.implementations {
            let _ = writeln!(out, "    └─ {} {}", imp.class_name, style(&imp.class_file).dim());
        }
    }

    if !analysis.multi_implementers.is_empty() {
        section(out, "Multi-implementers");
        for multi in &analysis.multi_implementers {
            let names: Vec<_> = multi
                .interfaces
                .iter()
                .map(|i| i.interface_name.as_str())
                .collect();
            let _ = writeln!(
                out,
                "  {} implements {}",
                style(&multi.class_name).cyan(),
                names.join(", ")
            );
        }
    }
}

fn render_extensions(out: &mut String, analysis: &ExtensionAnalysis) {
    let stats = &analysis.stats;
    section(out, "Class hierarchy");
    let _ = writeln!(
        out,
        "  {} extended classes, {} extension relations",
        stats.extended_class_count, stats.total_extension_relations
    );

    for ext in &analysis.extensions {
        let _ = writeln!(
            out,
            "  {} {}",
            style(&ext.parent_name).cyan(),
            style(&ext.parent_file).dim()
        );
        for child in &ext.children {
            let _ = writeln!(out, "    └─ {} {}", child.class_name, style(&child.class_file).dim());
        }
    }

    let hierarchy = &analysis.hierarchy;
    let deepest: Vec<_> = hierarchy
        .deepest_classes
        .iter()
        .map(|c| c.class_name.as_str())
        .collect();
    let _ = writeln!(out, "  Max depth: {}", hierarchy.max_depth);
    if !deepest.is_empty() {
        let _ = writeln!(out, "  Deepest: {}", deepest.join(", "));
    }
    if let Some(cycle) = &hierarchy.cycle {
        let _ = writeln!(
            out,
            "  {} {}",
            style("Cycle:").yellow(),
            cycle.join(" -> ")
        );
    }
}
