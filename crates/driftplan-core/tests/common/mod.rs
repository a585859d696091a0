use driftplan_core::model::{
    Group, ParsedRepo, PlatformSet, Policy, Profile, Query, RemoteGroup, RemotePolicy,
    RemoteProfile, RemoteQuery, RemoteSnapshot,
};

/// A darwin policy with the given query
#[allow(dead_code)]
pub fn policy(name: &str, query: &str) -> Policy {
    Policy {
        name: name.to_string(),
        query: query.to_string(),
        platform: PlatformSet::parse("darwin"),
        ..Default::default()
    }
}

/// The remote twin of [`policy`], with usage counts
#[allow(dead_code)]
pub fn remote_policy(name: &str, query: &str, passing: u64, failing: u64) -> RemotePolicy {
    RemotePolicy {
        name: name.to_string(),
        query: query.to_string(),
        platform: PlatformSet::parse("darwin"),
        passing_host_count: passing,
        failing_host_count: failing,
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn query(name: &str, sql: &str, interval: u32) -> Query {
    Query {
        name: name.to_string(),
        query: sql.to_string(),
        interval,
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn remote_query(name: &str, sql: &str, interval: u32) -> RemoteQuery {
    RemoteQuery {
        name: name.to_string(),
        query: sql.to_string(),
        interval,
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn profile(name: &str, path: &str) -> Profile {
    Profile {
        name: name.to_string(),
        platform: "darwin".to_string(),
        path: path.to_string(),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn remote_profile(name: &str) -> RemoteProfile {
    RemoteProfile {
        profile_uuid: format!("uuid-{}", name),
        name: name.to_string(),
        platform: "darwin".to_string(),
    }
}

/// A repository holding the given groups and nothing else
#[allow(dead_code)]
pub fn repo_with(groups: Vec<Group>) -> ParsedRepo {
    ParsedRepo {
        groups,
        ..Default::default()
    }
}

/// A snapshot holding the given groups and nothing else
#[allow(dead_code)]
pub fn snapshot_with(groups: Vec<RemoteGroup>) -> RemoteSnapshot {
    RemoteSnapshot {
        groups,
        ..Default::default()
    }
}

/// Build a remote group that mirrors a proposed group exactly.
#[allow(dead_code)]
pub fn mirror(group: &Group) -> RemoteGroup {
    use driftplan_core::model::{
        RemotePackage, RemoteSoftware, RemoteStoreApp, RemoteVendorApp,
    };

    RemoteGroup {
        id: 1,
        name: group.name.clone(),
        policies: group
            .policies
            .iter()
            .map(|p| RemotePolicy {
                name: p.name.clone(),
                query: p.query.clone(),
                description: p.description.clone(),
                resolution: p.resolution.clone(),
                platform: p.platform.clone(),
                critical: p.critical,
                labels_include_any: p.labels_include_any.clone(),
                labels_exclude_any: p.labels_exclude_any.clone(),
                ..Default::default()
            })
            .collect(),
        queries: group
            .queries
            .iter()
            .map(|q| RemoteQuery {
                name: q.name.clone(),
                query: q.query.clone(),
                interval: q.interval,
                platform: q.platform.clone(),
                logging: q.logging,
                ..Default::default()
            })
            .collect(),
        profiles: group
            .profiles
            .iter()
            .map(|p| RemoteProfile {
                name: p.name.clone(),
                platform: p.platform.clone(),
                ..Default::default()
            })
            .collect(),
        software: RemoteSoftware {
            packages: group
                .software
                .packages
                .iter()
                .map(|p| RemotePackage {
                    url: p.url.clone(),
                    hash_sha256: p.hash_sha256.clone(),
                    self_service: p.self_service,
                    referenced_yaml_path: p.ref_path.clone(),
                })
                .collect(),
            vendor_apps: Some(
                group
                    .software
                    .vendor_apps
                    .iter()
                    .map(|a| RemoteVendorApp {
                        slug: a.slug.clone(),
                        self_service: a.self_service,
                    })
                    .collect(),
            ),
            store_apps: group
                .software
                .store_apps
                .iter()
                .map(|a| RemoteStoreApp {
                    store_id: a.store_id.clone(),
                    self_service: a.self_service,
                })
                .collect(),
        },
        software_titles: Vec::new(),
    }
}
