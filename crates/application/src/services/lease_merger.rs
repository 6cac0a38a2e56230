use adguard_exporter_domain::{DhcpStatus, Lease, LeaseType, MergedLeases, RawLease};

/// Tags raw DHCP leases with their origin and joins them dynamic-first.
///
/// Input lists are only borrowed; every output lease is a fresh copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeaseMerger;

impl LeaseMerger {
    pub fn new() -> Self {
        Self
    }

    pub fn merge(&self, dynamic: &[RawLease], static_leases: &[RawLease]) -> MergedLeases {
        let dynamic = tag_all(dynamic, LeaseType::Dynamic);
        let static_leases = tag_all(static_leases, LeaseType::Static);

        let mut leases = Vec::with_capacity(dynamic.len() + static_leases.len());
        leases.extend(dynamic.iter().cloned());
        leases.extend(static_leases.iter().cloned());

        MergedLeases {
            dynamic,
            static_leases,
            leases,
        }
    }

    pub fn merge_status(&self, status: &DhcpStatus) -> MergedLeases {
        self.merge(&status.dynamic_leases, &status.static_leases)
    }
}

fn tag_all(raw: &[RawLease], lease_type: LeaseType) -> Vec<Lease> {
    raw.iter().map(|lease| Lease::tagged(lease, lease_type)).collect()
}
