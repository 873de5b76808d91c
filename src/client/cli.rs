//! `ResourceLister` and `DetailLookup` backed by the OCI CLI
//!
//! Each call runs `oci <service> <resource> <verb> ... --output json` with the
//! operator's config file and profile, so request signing, session tokens and
//! instance principals all work exactly as they do for the CLI. Listing calls
//! pass `--all` so the CLI follows pagination.

use super::{DetailLookup, ResourceLister};
use crate::credentials::OciProfile;
use crate::error::{ConfigError, CostChefError, Result};
use crate::model::{
    AutonomousDatabase, DbSystem, Instance, LoadBalancer, LoadBalancerDetail, PublicIp, Scope,
    SecurityList, Vcn, Volume, VolumeAttachment,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

pub struct OciCliClient {
    program: PathBuf,
    config_file: PathBuf,
    profile: String,
}

impl OciCliClient {
    /// Locate `oci` on PATH and bind it to `profile`.
    pub fn new(profile: &OciProfile) -> Result<Self> {
        let program = which::which("oci").map_err(|e| ConfigError::CliNotFound(e.to_string()))?;
        Ok(Self::with_program(program, profile))
    }

    /// Use a specific executable instead of searching PATH.
    pub fn with_program(program: impl Into<PathBuf>, profile: &OciProfile) -> Self {
        Self {
            program: program.into(),
            config_file: profile.config_path.clone(),
            profile: profile.name.clone(),
        }
    }

    async fn invoke(&self, args: &[&str]) -> Result<Option<Value>> {
        let command_line = args.join(" ");
        let service = args.first().copied().unwrap_or("oci").to_string();
        debug!("Running: oci {}", command_line);

        let output = Command::new(&self.program)
            .args(args)
            .arg("--config-file")
            .arg(&self.config_file)
            .arg("--profile")
            .arg(&self.profile)
            .arg("--output")
            .arg("json")
            .output()
            .await
            .map_err(|e| CostChefError::CloudProvider {
                service: service.clone(),
                message: format!("Failed to execute oci {}", command_line),
                source: Some(Box::new(e)),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CostChefError::cloud(
                service,
                format!(
                    "oci {} exited with {}: {}",
                    command_line,
                    output.status,
                    summarize_stderr(&stderr)
                ),
            ));
        }

        parse_data(&output.stdout)
    }

    async fn list<T: DeserializeOwned>(&self, args: &[&str]) -> Result<Vec<T>> {
        match self.invoke(args).await? {
            Some(data) => Ok(serde_json::from_value(data)?),
            None => Ok(Vec::new()),
        }
    }

    async fn get<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T> {
        match self.invoke(args).await? {
            Some(data) => Ok(serde_json::from_value(data)?),
            None => Err(CostChefError::cloud(
                args.first().copied().unwrap_or("oci"),
                format!("oci {} returned no data", args.join(" ")),
            )),
        }
    }
}

/// Extract the `data` member of a CLI response. The CLI prints nothing at
/// all for an empty listing, which maps to `None`.
pub(crate) fn parse_data(stdout: &[u8]) -> Result<Option<Value>> {
    let text = String::from_utf8_lossy(stdout);
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let mut document: Value = serde_json::from_str(text)?;
    match document.get_mut("data").map(Value::take) {
        None | Some(Value::Null) => Ok(None),
        Some(data) => Ok(Some(data)),
    }
}

/// The CLI's service errors are a JSON blob after a `ServiceError:` line;
/// keep the message and code when present, otherwise the last line.
fn summarize_stderr(stderr: &str) -> String {
    let stderr = stderr.trim();
    if let Some(start) = stderr.find('{') {
        if let Ok(blob) = serde_json::from_str::<Value>(&stderr[start..]) {
            let code = blob.get("code").and_then(Value::as_str);
            let message = blob.get("message").and_then(Value::as_str);
            if let (Some(code), Some(message)) = (code, message) {
                return format!("{} ({})", message, code);
            }
        }
    }
    stderr.lines().last().unwrap_or("no output").to_string()
}

#[async_trait]
impl ResourceLister for OciCliClient {
    async fn get_compartment(&self, compartment_id: &str) -> Result<Scope> {
        self.get(&["iam", "compartment", "get", "--compartment-id", compartment_id])
            .await
    }

    async fn list_db_systems(&self, compartment_id: &str) -> Result<Vec<DbSystem>> {
        self.list(&["db", "system", "list", "--compartment-id", compartment_id, "--all"])
            .await
    }

    async fn list_autonomous_databases(
        &self,
        compartment_id: &str,
    ) -> Result<Vec<AutonomousDatabase>> {
        self.list(&[
            "db",
            "autonomous-database",
            "list",
            "--compartment-id",
            compartment_id,
            "--all",
        ])
        .await
    }

    async fn list_instances(&self, compartment_id: &str) -> Result<Vec<Instance>> {
        self.list(&["compute", "instance", "list", "--compartment-id", compartment_id, "--all"])
            .await
    }

    async fn list_volumes(&self, compartment_id: &str) -> Result<Vec<Volume>> {
        self.list(&["bv", "volume", "list", "--compartment-id", compartment_id, "--all"])
            .await
    }

    async fn list_public_ips(&self, compartment_id: &str) -> Result<Vec<PublicIp>> {
        self.list(&[
            "network",
            "public-ip",
            "list",
            "--scope",
            "REGION",
            "--compartment-id",
            compartment_id,
            "--all",
        ])
        .await
    }

    async fn list_load_balancers(&self, compartment_id: &str) -> Result<Vec<LoadBalancer>> {
        self.list(&["lb", "load-balancer", "list", "--compartment-id", compartment_id, "--all"])
            .await
    }

    async fn list_vcns(&self, compartment_id: &str) -> Result<Vec<Vcn>> {
        self.list(&["network", "vcn", "list", "--compartment-id", compartment_id, "--all"])
            .await
    }
}

#[async_trait]
impl DetailLookup for OciCliClient {
    async fn list_volume_attachments(
        &self,
        compartment_id: &str,
        volume_id: &str,
    ) -> Result<Vec<VolumeAttachment>> {
        self.list(&[
            "compute",
            "volume-attachment",
            "list",
            "--compartment-id",
            compartment_id,
            "--volume-id",
            volume_id,
            "--all",
        ])
        .await
    }

    async fn get_load_balancer(&self, load_balancer_id: &str) -> Result<LoadBalancerDetail> {
        self.get(&["lb", "load-balancer", "get", "--load-balancer-id", load_balancer_id])
            .await
    }

    async fn list_security_lists(
        &self,
        compartment_id: &str,
        vcn_id: &str,
    ) -> Result<Vec<SecurityList>> {
        self.list(&[
            "network",
            "security-list",
            "list",
            "--compartment-id",
            compartment_id,
            "--vcn-id",
            vcn_id,
            "--all",
        ])
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_data(b"").unwrap().is_none());
        assert!(parse_data(b"  \n").unwrap().is_none());
    }

    #[test]
    fn test_parse_data_envelope() {
        let out = br#"{"data": [{"id": "a"}, {"id": "b"}], "opc-next-page": null}"#;
        let data = parse_data(out).unwrap().unwrap();
        assert_eq!(data.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_parse_null_data() {
        assert!(parse_data(br#"{"data": null}"#).unwrap().is_none());
        assert!(parse_data(br#"{"etag": "x"}"#).unwrap().is_none());
    }

    #[test]
    fn test_parse_garbage_is_error() {
        assert!(matches!(
            parse_data(b"Usage: oci [OPTIONS]"),
            Err(CostChefError::Json(_))
        ));
    }

    #[test]
    fn test_summarize_service_error() {
        let stderr = "ServiceError:\n{\n  \"code\": \"NotAuthorizedOrNotFound\",\n  \"message\": \"Authorization failed or requested resource not found.\",\n  \"status\": 404\n}\n";
        assert_eq!(
            summarize_stderr(stderr),
            "Authorization failed or requested resource not found. (NotAuthorizedOrNotFound)"
        );
        assert_eq!(summarize_stderr("line one\nline two\n"), "line two");
        assert_eq!(summarize_stderr(""), "no output");
    }

    #[tokio::test]
    async fn test_missing_program_is_cloud_error() {
        let profile = OciProfile {
            name: "DEFAULT".to_string(),
            config_path: PathBuf::from("/nonexistent/config"),
            tenancy: "ocid1.tenancy.oc1..aaaa".to_string(),
            region: None,
        };
        let client = OciCliClient::with_program("/nonexistent/bin/oci", &profile);
        let err = client.list_vcns("ocid1.compartment.oc1..aaaa").await.unwrap_err();
        assert!(matches!(err, CostChefError::CloudProvider { .. }));
    }
}
