use crate::git::RepoStatus;

/// Sort bucket for grouped display; lower sorts first.
pub fn priority(status: &RepoStatus) -> u8 {
    if status.error.is_some() {
        0
    } else if !status.has_upstream {
        4
    } else if status.needs_pull() {
        1
    } else if status.needs_push() {
        2
    } else {
        3
    }
}

/// Display order as indices into `statuses`.
///
/// Grouped: errors, then behind, ahead, synced and finally repositories
/// without an upstream, each bucket by name. Ungrouped: configuration order.
pub fn compute_order(statuses: &[RepoStatus], grouped: bool) -> Vec<usize> {
    let mut order: Vec<usize> = (0..statuses.len()).collect();
    if grouped {
        order.sort_by(|&a, &b| {
            let (sa, sb) = (&statuses[a], &statuses[b]);
            priority(sa)
                .cmp(&priority(sb))
                .then_with(|| sa.name.cmp(&sb.name))
        });
    }
    order
}
