use crate::model::OperationBlock;
use crate::time::{self, EPSILON};
use tracing::debug;

/// Découpe un bloc d'ouverture en créneaux contigus, sans chevauchement.
///
/// `consumed` contient les intervalles déjà couverts ce jour-là (créneaux
/// work-study notamment) ; ils sont soustraits du bloc avant le découpage.
/// `lengths` est l'ordre (mélangé) des durées autorisées pour la génération :
/// on prend la première qui tient dans ce qu'il reste. Un reliquat plus
/// court que `min_len` est absorbé par le créneau précédent.
pub(super) fn partition_block(
    block: &OperationBlock,
    consumed: &[(f64, f64)],
    lengths: &[u32],
    min_len: u32,
) -> Vec<(f64, f64)> {
    let min = f64::from(min_len);
    let Some(smallest) = lengths.iter().min().map(|l| f64::from(*l)) else {
        return Vec::new();
    };

    let slots = consumed
        .iter()
        .fold(vec![(block.start_hour, block.end_hour)], |slots, &(start, end)| {
            time::subtract(slots, start, end)
        });

    let mut out = Vec::new();
    for (slot_start, slot_end) in slots {
        if slot_end - slot_start < min - EPSILON {
            debug!(
                start = %time::format_time(slot_start),
                end = %time::format_time(slot_end),
                "slot shorter than minimum shift length, left uncovered"
            );
            continue;
        }

        let mut cursor = slot_start;
        while slot_end - cursor > EPSILON {
            let remaining = slot_end - cursor;
            let end = match lengths
                .iter()
                .map(|l| f64::from(*l))
                .find(|l| *l <= remaining + EPSILON)
            {
                Some(len) if slot_end - (cursor + len) < min - EPSILON => slot_end,
                Some(len) => cursor + len,
                None => (cursor + smallest).min(slot_end),
            };
            out.push((cursor, end));
            cursor = end;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::partition_block;
    use crate::model::OperationBlock;

    #[test]
    fn splits_block_with_single_length() {
        let block = OperationBlock::new(10.0, 22.0);
        let shifts = partition_block(&block, &[], &[4], 2);
        assert_eq!(shifts, vec![(10.0, 14.0), (14.0, 18.0), (18.0, 22.0)]);
    }

    #[test]
    fn short_tail_is_merged_into_previous_shift() {
        let block = OperationBlock::new(10.0, 19.0);
        let shifts = partition_block(&block, &[], &[4], 2);
        assert_eq!(shifts, vec![(10.0, 14.0), (14.0, 19.0)]);
    }

    #[test]
    fn remainder_shorter_than_every_length_closes_the_block() {
        let block = OperationBlock::new(10.0, 21.0);
        let shifts = partition_block(&block, &[], &[4], 2);
        assert_eq!(shifts, vec![(10.0, 14.0), (14.0, 18.0), (18.0, 21.0)]);
    }

    #[test]
    fn first_fitting_length_in_run_order_wins() {
        let block = OperationBlock::new(10.0, 17.0);
        let shifts = partition_block(&block, &[], &[5, 2], 2);
        assert_eq!(shifts, vec![(10.0, 15.0), (15.0, 17.0)]);

        let shifts = partition_block(&block, &[], &[2, 5], 2);
        assert_eq!(shifts, vec![(10.0, 12.0), (12.0, 14.0), (14.0, 17.0)]);
    }

    #[test]
    fn consumed_intervals_are_subtracted_and_short_gaps_dropped() {
        let block = OperationBlock::new(8.0, 20.0);
        let shifts = partition_block(&block, &[(9.0, 14.0)], &[3], 2);
        assert_eq!(shifts, vec![(14.0, 17.0), (17.0, 20.0)]);
    }

    #[test]
    fn overnight_block_is_partitioned_past_midnight() {
        let block = OperationBlock::new(22.0, 2.0);
        let shifts = partition_block(&block, &[], &[2], 2);
        assert_eq!(shifts, vec![(22.0, 24.0), (24.0, 26.0)]);
    }
}
