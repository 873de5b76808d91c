//! Single self-contained HTML report covering every category

use crate::findings::{Category, Finding, ReportBundle};

pub fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// How one category is laid out in the HTML report.
struct SectionLayout {
    heading: &'static str,
    /// (column header, finding field, highlighted)
    columns: &'static [(&'static str, &'static str, bool)],
    empty_message: &'static str,
}

const COMPUTE_COLUMNS: [(&str, &str, bool); 6] = [
    ("Instance Name", "instance_name", false),
    ("Shape", "shape", false),
    ("State", "lifecycle_state", false),
    ("Availability Domain", "availability_domain", false),
    ("Created", "time_created", false),
    ("Tags", "tags", false),
];

const OVERSIZED_COLUMNS: [(&str, &str, bool); 6] = [
    ("Instance Name", "instance_name", false),
    ("Shape", "shape", true),
    ("State", "lifecycle_state", false),
    ("Availability Domain", "availability_domain", false),
    ("Created", "time_created", false),
    ("Tags", "tags", false),
];

fn layout(category: Category) -> SectionLayout {
    match category {
        Category::DatabaseInstances => SectionLayout {
            heading: "Database Instances Using Production-Grade Shapes",
            columns: &[
                ("Resource Type", "resource_type", false),
                ("Name", "name", false),
                ("Shape", "shape", true),
                ("State", "lifecycle_state", false),
                ("Availability Domain", "availability_domain", false),
                ("CPU Cores", "cpu_core_count", false),
                ("Tags", "tags", false),
            ],
            empty_message:
                "Excellent! All dev/test database instances are using appropriate shapes.",
        },
        Category::ComputeMissingAutomation => SectionLayout {
            heading: "Compute Instances Missing Automation Tags",
            columns: &COMPUTE_COLUMNS,
            empty_message: "All dev/test compute instances have automation tags configured!",
        },
        Category::OversizedCompute => SectionLayout {
            heading: "Oversized Compute Instances for Dev/Test",
            columns: &OVERSIZED_COLUMNS,
            empty_message: "No oversized compute instances found in dev/test environments!",
        },
        Category::UnattachedVolumes => SectionLayout {
            heading: "Unattached Block Volumes",
            columns: &[
                ("Volume Name", "volume_name", false),
                ("Size (GB)", "size_gb", false),
                ("Type", "volume_type", false),
                ("Availability Domain", "availability_domain", false),
                ("Created", "time_created", false),
                ("Tags", "tags", false),
            ],
            empty_message: "No unattached block volumes found!",
        },
        Category::UnusedPublicIps => SectionLayout {
            heading: "Unused Public IP Addresses",
            columns: &[
                ("Public IP Name", "public_ip_name", false),
                ("IP Address", "ip_address", false),
                ("Scope", "scope", false),
                ("Lifetime", "lifetime", false),
                ("Created", "time_created", false),
                ("Tags", "tags", false),
            ],
            empty_message: "No unused public IP addresses found!",
        },
        Category::EmptyLoadBalancers => SectionLayout {
            heading: "Load Balancers with No Backends",
            columns: &[
                ("Load Balancer Name", "load_balancer_name", false),
                ("Shape", "shape", false),
                ("State", "lifecycle_state", false),
                ("IP Addresses", "ip_addresses", false),
                ("Created", "time_created", false),
                ("Tags", "tags", false),
            ],
            empty_message: "All load balancers have active backends!",
        },
        Category::PermissiveSecurityLists => SectionLayout {
            heading: "Permissive Security Lists",
            columns: &[
                ("Security List Name", "security_list_name", false),
                ("VCN Name", "vcn_name", false),
                ("Permissive Rules", "permissive_rules_count", true),
                ("Rule Details", "permissive_rules", true),
                ("Tags", "tags", false),
            ],
            empty_message: "No overly permissive security lists found!",
        },
    }
}

const RECOMMENDATIONS: [(&str, &str); 10] = [
    ("Database Right-Sizing", "Switch to VM.Standard2.1, VM.Standard.E2.1, or Always Free Autonomous DB for dev/test. Production power isn't needed for testing recipes."),
    ("Compute Auto-Shutdown", "Tag instances with automation schedules to stop after hours. Your OCI bill will thank you for turning off the oven."),
    ("Compute Right-Sizing", "Use VM.Standard.E2.1.Micro, VM.Standard2.1, or Always Free shapes for dev/test. No need for large servings when a small plate will do."),
    ("Block Volume Cleanup", "Delete unattached volumes. These orphaned ingredients are still charging you storage fees."),
    ("Release Public IPs", "Return unused public IPs to OCI. Each idle IP costs money when not attached to resources."),
    ("Load Balancer Cleanup", "Remove load balancers with no backends. Empty serving trays cost money without providing value."),
    ("Security List Tightening", "Close unnecessary 0.0.0.0/0 rules. Keep your dev kitchen secure without leaving doors wide open."),
    ("Always Free Resources", "Use the OCI Always Free tier for long-running dev/test workloads. It's like getting free ingredients forever!"),
    ("Cost Budgets", "Set up OCI Budget alerts to catch cost spikes before they burn your wallet."),
    ("Preemptible Instances", "Use preemptible compute for fault-tolerant dev/test workloads to save up to 50%."),
];

const STYLE: &str = r#"
        body { font-family: 'Oracle Sans', 'Helvetica Neue', Arial, sans-serif; margin: 20px; background-color: #f7f7f7; }
        .container { background-color: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 8px rgba(0,0,0,0.1); }
        h1, h2 { color: #312d2a; }
        h1 { border-bottom: 3px solid #ff4800; padding-bottom: 10px; }
        table { border-collapse: collapse; width: 100%; margin-bottom: 30px; }
        th, td { border: 1px solid #e0e0e0; padding: 12px; text-align: left; }
        th { background: linear-gradient(135deg, #312d2a 0%, #ff4800 100%); color: white; font-weight: bold; }
        tr:nth-child(even) { background-color: #fafafa; }
        tr:hover { background-color: #fff3e0; }
        .summary { background: linear-gradient(135deg, #ff4800 0%, #ff6800 100%); color: white; padding: 20px; border-radius: 8px; margin-bottom: 20px; }
        .summary-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(250px, 1fr)); gap: 15px; }
        .warning { color: #d32f2f; font-weight: bold; }
        .ok { color: #2e7d32; }
        .timestamp { color: #666; font-size: 0.9em; }
        .footer { margin-top: 30px; padding-top: 20px; border-top: 1px solid #e0e0e0; text-align: center; color: #666; }
        .metric { font-weight: bold; font-size: 1.1em; }
    "#;

/// Render the full report. `generated_at` is shown verbatim (escaped).
pub fn render_html(bundle: &ReportBundle, generated_at: &str) -> String {
    let generated_at = html_escape(generated_at);
    let mut html = String::from(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>OCI Dev/Test Resource Cost Chef Report</title>
    <style>"#,
    );
    html.push_str(STYLE);
    html.push_str(
        r#"</style>
</head>
<body>
    <div class="container">
        <h1>OCI Dev/Test Resource Cost Chef Report</h1>
"#,
    );
    html.push_str(&format!(
        "        <div class=\"timestamp\">Generated on: {}</div>\n",
        generated_at
    ));

    render_summary(&mut html, bundle);

    for (category, findings) in bundle.sections() {
        render_section(&mut html, category, findings);
    }

    html.push_str("        <h2>Chef's OCI Cost-Saving Recommendations</h2>\n        <ul>\n");
    for (title, text) in RECOMMENDATIONS {
        html.push_str(&format!(
            "            <li><strong>{}:</strong> {}</li>\n",
            html_escape(title),
            html_escape(text)
        ));
    }
    html.push_str("        </ul>\n");

    html.push_str(&format!(
        r#"        <div class="footer">
            <p>Generated on {}</p>
            <p>CloudCostChefs - Serving up OCI savings, one resource at a time</p>
        </div>
    </div>
</body>
</html>
"#,
        generated_at
    ));

    html
}

fn render_summary(html: &mut String, bundle: &ReportBundle) {
    html.push_str(
        r#"        <div class="summary">
            <h3 style="margin-top: 0; color: white;">Cost Optimization Opportunities</h3>
            <div class="summary-grid">
"#,
    );
    for (category, count) in bundle.counts() {
        html.push_str(&format!(
            "                <div>{}: <span class=\"metric\" id=\"count-{}\">{}</span></div>\n",
            html_escape(category.summary_label()),
            category.key(),
            count
        ));
    }
    html.push_str(&format!(
        "                <div>Total Opportunities: <span class=\"metric\" id=\"count-total\">{}</span></div>\n",
        bundle.total()
    ));
    html.push_str("            </div>\n        </div>\n");
}

fn render_section(html: &mut String, category: Category, findings: &[Finding]) {
    let layout = layout(category);
    html.push_str(&format!(
        "        <h2 id=\"section-{}\">{}</h2>\n",
        category.key(),
        html_escape(layout.heading)
    ));

    if findings.is_empty() {
        html.push_str(&format!(
            "        <p class=\"ok\">{}</p>\n",
            html_escape(layout.empty_message)
        ));
        return;
    }

    html.push_str("        <table>\n            <tr>");
    for (header, _, _) in layout.columns {
        html.push_str(&format!("<th>{}</th>", html_escape(header)));
    }
    html.push_str("</tr>\n");

    for finding in findings {
        html.push_str("            <tr>");
        for (_, field, highlighted) in layout.columns {
            let value = finding.field(field).unwrap_or_default();
            if *highlighted {
                html.push_str(&format!("<td class=\"warning\">{}</td>", html_escape(&value)));
            } else {
                html.push_str(&format!("<td>{}</td>", html_escape(&value)));
            }
        }
        html.push_str("</tr>\n");
    }
    html.push_str("        </table>\n");
}
