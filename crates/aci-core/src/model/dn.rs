//! Distinguished-name construction.
//!
//! Every managed object lives at a hierarchical DN under the policy
//! universe root `uni`. These helpers own the relative-name prefixes
//! (`tn-`, `ctx-`, `BD-`, `brc-`, `subj-`, `flt-`) so the rest of the
//! crate never formats DNs by hand.

/// `uni/tn-{tenant}`
pub fn tenant(tenant: &str) -> String {
    format!("uni/tn-{tenant}")
}

/// `uni/tn-{tenant}/ctx-{name}`
pub fn context(tenant: &str, name: &str) -> String {
    format!("uni/tn-{tenant}/ctx-{name}")
}

/// `uni/tn-{tenant}/BD-{name}`
pub fn bridge_domain(tenant: &str, name: &str) -> String {
    format!("uni/tn-{tenant}/BD-{name}")
}

/// `uni/tn-{tenant}/BD-{bd}/subnet-[{ip}]`
pub fn subnet(tenant: &str, bd: &str, ip: &str) -> String {
    format!("uni/tn-{tenant}/BD-{bd}/subnet-[{ip}]")
}

/// `uni/tn-{tenant}/brc-{name}`
pub fn contract(tenant: &str, name: &str) -> String {
    format!("uni/tn-{tenant}/brc-{name}")
}

/// `uni/tn-{tenant}/brc-{contract}/subj-{name}`
pub fn subject(tenant: &str, contract: &str, name: &str) -> String {
    format!("uni/tn-{tenant}/brc-{contract}/subj-{name}")
}

/// `{subject}/intmnl` -- the inbound term container of a split-mode subject.
pub fn subject_in_term(tenant: &str, contract: &str, name: &str) -> String {
    format!("{}/intmnl", subject(tenant, contract, name))
}

/// `{subject}/outtmnl` -- the outbound term container of a split-mode subject.
pub fn subject_out_term(tenant: &str, contract: &str, name: &str) -> String {
    format!("{}/outtmnl", subject(tenant, contract, name))
}

/// `uni/tn-{tenant}/flt-{name}`
pub fn filter(tenant: &str, name: &str) -> String {
    format!("uni/tn-{tenant}/flt-{name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dn_paths() {
        assert_eq!(tenant("t1"), "uni/tn-t1");
        assert_eq!(context("t1", "c1"), "uni/tn-t1/ctx-c1");
        assert_eq!(bridge_domain("t1", "bd1"), "uni/tn-t1/BD-bd1");
        assert_eq!(
            subnet("t1", "bd1", "10.1.100.1/24"),
            "uni/tn-t1/BD-bd1/subnet-[10.1.100.1/24]"
        );
        assert_eq!(contract("t1", "web"), "uni/tn-t1/brc-web");
        assert_eq!(subject("t1", "web", "s1"), "uni/tn-t1/brc-web/subj-s1");
        assert_eq!(
            subject_in_term("t1", "web", "s1"),
            "uni/tn-t1/brc-web/subj-s1/intmnl"
        );
        assert_eq!(filter("common", "icmp"), "uni/tn-common/flt-icmp");
    }
}
