//! Display order of the wallet picker.
//!
//! Order: wallets the user picked before (most recent first), then other
//! available wallets, then unavailable ones. The last two groups keep the
//! order the host supplied.

use lk_api_types::SupportedWallet;
use lk_storage::UsageRecord;
use tracing::warn;

pub fn rank_wallets(allowed: &[SupportedWallet], usage: &UsageRecord) -> Vec<SupportedWallet> {
    let (available, unavailable): (Vec<&SupportedWallet>, Vec<&SupportedWallet>) =
        allowed.iter().partition(|wallet| wallet.is_available);

    if usage.is_empty() {
        return available.into_iter().chain(unavailable).cloned().collect();
    }

    let (mut used, unused): (Vec<&SupportedWallet>, Vec<&SupportedWallet>) = available
        .into_iter()
        .partition(|wallet| usage.position(&wallet.id).is_some());
    used.sort_by_key(|wallet| usage.position(&wallet.id));

    used.into_iter()
        .chain(unused)
        .chain(unavailable)
        .cloned()
        .collect()
}

/// The platform-wrapper wallet, when exactly one is offered.
///
/// With more than one candidate there is no safe automatic choice, so the
/// picker is shown instead.
pub fn platform_wrapper(allowed: &[SupportedWallet]) -> Option<&SupportedWallet> {
    let mut wrappers = allowed.iter().filter(|wallet| wallet.is_platform_wrapper);
    let first = wrappers.next()?;
    if wrappers.next().is_some() {
        warn!("several platform-wrapper wallets offered; showing the picker");
        return None;
    }
    Some(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lk_api_types::WalletId;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn wallet(id: &str, available: bool) -> SupportedWallet {
        SupportedWallet {
            id: WalletId::from(id),
            name: id.to_owned(),
            icon: String::new(),
            url: String::new(),
            is_available: available,
            is_platform_wrapper: false,
        }
    }

    fn ids(wallets: &[SupportedWallet]) -> Vec<&str> {
        wallets.iter().map(|w| w.id.as_str()).collect()
    }

    #[test]
    fn empty_ledger_puts_available_first_in_input_order() {
        let allowed = vec![
            wallet("x", false),
            wallet("a", true),
            wallet("y", false),
            wallet("b", true),
        ];
        let ranked = rank_wallets(&allowed, &UsageRecord::default());
        assert_eq!(ids(&ranked), vec!["a", "b", "x", "y"]);
    }

    #[test]
    fn most_recent_use_comes_first() {
        let allowed = vec![wallet("a", true), wallet("b", true), wallet("c", false)];
        let ranked = rank_wallets(&allowed, &UsageRecord::from(vec!["b", "a"]));
        assert_eq!(ids(&ranked), vec!["b", "a", "c"]);
    }

    #[test]
    fn used_but_unavailable_wallet_stays_in_unavailable_group() {
        let allowed = vec![
            wallet("freighter", false),
            wallet("albedo", true),
            wallet("xbull", true),
            wallet("lobstr", true),
        ];
        let usage = UsageRecord::from(vec!["freighter", "lobstr", "ghost"]);
        let ranked = rank_wallets(&allowed, &usage);
        assert_eq!(ids(&ranked), vec!["lobstr", "albedo", "xbull", "freighter"]);
    }

    #[test]
    fn platform_wrapper_requires_exactly_one_candidate() {
        let mut only = wallet("wrapper", true);
        only.is_platform_wrapper = true;
        let allowed = vec![wallet("a", true), only.clone()];
        assert_eq!(platform_wrapper(&allowed), Some(&only));

        let mut second = wallet("wrapper-2", true);
        second.is_platform_wrapper = true;
        let crowded = vec![only, second];
        assert_eq!(platform_wrapper(&crowded), None);

        assert_eq!(platform_wrapper(&[wallet("a", true)]), None);
    }

    proptest! {
        #[test]
        fn ranking_is_a_permutation_with_ordered_groups(
            availability in proptest::collection::vec(any::<bool>(), 0..9),
            used in proptest::collection::vec(0usize..12, 0..6),
        ) {
            let allowed: Vec<SupportedWallet> = availability
                .iter()
                .enumerate()
                .map(|(n, available)| wallet(&format!("w{n}"), *available))
                .collect();
            let mut usage_ids: Vec<String> = Vec::new();
            for n in used {
                let id = format!("w{n}");
                if !usage_ids.contains(&id) {
                    usage_ids.push(id);
                }
            }
            let usage = UsageRecord::from(usage_ids.iter().map(String::as_str).collect::<Vec<_>>());

            let ranked = rank_wallets(&allowed, &usage);

            prop_assert_eq!(ranked.len(), allowed.len());
            let ranked_ids: HashSet<&str> = ranked.iter().map(|w| w.id.as_str()).collect();
            let allowed_ids: HashSet<&str> = allowed.iter().map(|w| w.id.as_str()).collect();
            prop_assert_eq!(ranked_ids, allowed_ids);

            let group = |w: &SupportedWallet| match (w.is_available, usage.position(&w.id)) {
                (true, Some(_)) => 0,
                (true, _) => 1,
                (false, _) => 2,
            };
            let groups: Vec<u8> = ranked.iter().map(group).collect();
            prop_assert!(groups.windows(2).all(|pair| pair[0] <= pair[1]), "groups out of order: {:?}", groups);

            let used_positions: Vec<usize> = ranked
                .iter()
                .filter(|w| group(*w) == 0)
                .filter_map(|w| usage.position(&w.id))
                .collect();
            prop_assert!(used_positions.windows(2).all(|pair| pair[0] < pair[1]));

            for target in [1, 2] {
                let ranked_group: Vec<&str> = ranked
                    .iter()
                    .filter(|w| group(*w) == target)
                    .map(|w| w.id.as_str())
                    .collect();
                let input_group: Vec<&str> = allowed
                    .iter()
                    .filter(|w| group(*w) == target)
                    .map(|w| w.id.as_str())
                    .collect();
                prop_assert_eq!(ranked_group, input_group);
            }
        }
    }
}
