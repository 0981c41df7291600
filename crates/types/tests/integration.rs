//! Integration tests for types

#[cfg(test)]
mod tests {
    use evm_types::*;
    use proptest::prelude::*;

    #[test]
    fn test_output_format_default() {
        let fmt = OutputFormat::default();
        assert_eq!(fmt, OutputFormat::Tty);
    }

    #[test]
    fn test_finding_kind_serialization() {
        let json = serde_json::to_string(&FindingKind::ManagedShimStale).unwrap();
        assert_eq!(json, r#""managed_shim_stale""#);
    }

    #[test]
    fn test_doctor_report_health() {
        let mut report = DoctorReport::default();
        assert!(report.is_healthy());
        report.findings.push(Finding {
            kind: FindingKind::OrphanedShim,
            subject: "/home/me/.evm/bin/evm-emacs".into(),
            detail: "no package is current".into(),
        });
        assert!(!report.is_healthy());
    }

    proptest! {
        #[test]
        fn prop_recipe_name_survives_yaml(name in "emacs-[0-9]{1,2}\\.[0-9]{1,2}(-[a-z]{1,8})?") {
            let yaml = format!("name: {name}\nsource:\n  tar_xz: https://example.com/{name}.tar.xz\n");
            let recipe = Recipe::from_yaml(&yaml).unwrap();
            prop_assert_eq!(&recipe.name, &name);
            prop_assert_eq!(recipe.source.archive().map(|(_, ext)| ext), Some("tar.xz"));
        }
    }
}
