//! Fixed security posture of every phase job.
//!
//! Pod: `fsGroupChangePolicy=OnRootMismatch`, `runAsNonRoot=true`, `RuntimeDefault` seccomp.
//! Container: numeric non-root user, no privilege escalation, every capability dropped.
//! Nothing here is configurable per phase.
use torc_model::{
    Capabilities, Capability, FsGroupChangePolicy, PodSecurityContext, SeccompProfile,
    SeccompProfileType, SecurityContext,
};

pub fn pod_security_context() -> PodSecurityContext {
    PodSecurityContext {
        fs_group_change_policy: Some(FsGroupChangePolicy::OnRootMismatch),
        run_as_non_root: Some(true),
        seccomp_profile: Some(SeccompProfile {
            profile_type: SeccompProfileType::RuntimeDefault,
        }),
    }
}

/// Container posture running as `run_as_user`.
pub fn container_security_context(run_as_user: i64) -> SecurityContext {
    SecurityContext {
        run_as_user: Some(run_as_user),
        allow_privilege_escalation: Some(false),
        capabilities: Some(Capabilities {
            add: Vec::new(),
            drop: vec![Capability::ALL],
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pod_posture_wire_shape() {
        let json = serde_json::to_value(pod_security_context()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "fsGroupChangePolicy": "OnRootMismatch",
                "runAsNonRoot": true,
                "seccompProfile": {"type": "RuntimeDefault"}
            })
        );
    }

    #[test]
    fn container_posture_drops_everything() {
        let ctx = container_security_context(1000);
        assert_eq!(ctx.run_as_user, Some(1000));
        assert_eq!(ctx.allow_privilege_escalation, Some(false));
        let caps = ctx.capabilities.unwrap();
        assert!(caps.add.is_empty());
        assert_eq!(caps.drop, [Capability::ALL]);
    }
}
