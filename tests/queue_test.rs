mod common;

use common::{track, tracks};
use trusound::playback::PlaybackQueue;

fn queue_at(ids: &[i64], index: usize) -> PlaybackQueue {
    let mut queue = PlaybackQueue::new();
    queue.set_and_play(tracks(ids), index).unwrap();
    queue
}

fn ids(queue: &PlaybackQueue) -> Vec<i64> {
    queue.tracks().iter().map(|t| t.id).collect()
}

#[test]
fn test_set_and_play_selects_index() {
    let list = tracks(&[1, 2, 3, 4]);
    for index in 0..list.len() {
        let mut queue = PlaybackQueue::new();
        let playing = queue.set_and_play(list.clone(), index).unwrap().clone();
        assert_eq!(playing, list[index]);
        assert_eq!(queue.current_track(), Some(&list[index]));
        assert_eq!(queue.current_index(), Some(index));
    }
}

#[test]
fn test_set_and_play_out_of_range_keeps_queue() {
    let mut queue = queue_at(&[1, 2], 1);

    assert!(queue.set_and_play(tracks(&[7, 8, 9]), 3).is_err());
    assert!(queue.set_and_play(Vec::new(), 0).is_err());

    assert_eq!(ids(&queue), vec![1, 2]);
    assert_eq!(queue.current_index(), Some(1));
}

#[test]
fn test_empty_queue_has_no_current_track() {
    let mut queue = PlaybackQueue::new();
    assert!(queue.current_track().is_none());
    assert!(queue.advance().is_none());
    assert!(queue.retreat().is_none());
    assert!(!queue.has_next());
    assert!(!queue.has_previous());
}

#[test]
fn test_advance_at_last_index_is_noop() {
    let mut queue = queue_at(&[1, 2, 3], 2);

    assert!(queue.advance().is_none());
    assert_eq!(queue.current_index(), Some(2));
    assert_eq!(ids(&queue), vec![1, 2, 3]);
    assert!(!queue.has_next());
}

#[test]
fn test_retreat_at_first_index_is_noop() {
    let mut queue = queue_at(&[1, 2, 3], 0);

    assert!(queue.retreat().is_none());
    assert_eq!(queue.current_index(), Some(0));
    assert!(!queue.has_previous());
}

#[test]
fn test_advance_then_retreat_returns_to_same_track() {
    let list = [1, 2, 3, 4, 5];
    for index in 1..list.len() - 1 {
        let mut queue = queue_at(&list, index);
        let before = queue.current_track().cloned();

        assert_eq!(queue.advance().map(|t| t.id), Some(list[index + 1]));
        assert_eq!(queue.retreat().map(|t| t.id), Some(list[index]));
        assert_eq!(queue.current_track().cloned(), before);
    }
}

#[test]
fn test_jump_inside_queue() {
    let mut queue = queue_at(&[1, 2, 3], 0);

    assert_eq!(queue.jump(2).unwrap().id, 3);
    assert_eq!(queue.current_index(), Some(2));

    assert!(queue.jump(3).is_err());
    assert_eq!(queue.current_index(), Some(2));
}

// Every (from, to, current) triple for several queue lengths: the current
// track stays current, and a moved current track lands on `to`.
#[test]
fn test_reorder_keeps_current_track_for_all_orderings() {
    for len in 3..=5 {
        let list: Vec<i64> = (1..=len).collect();
        for current in 0..list.len() {
            for from in 0..list.len() {
                for to in 0..list.len() {
                    let mut queue = queue_at(&list, current);
                    let current_id = list[current];
                    let moved_id = list[from];

                    queue.reorder(from, to).unwrap();

                    let mut expected = list.clone();
                    let moved = expected.remove(from);
                    expected.insert(to, moved);
                    assert_eq!(ids(&queue), expected, "from={} to={}", from, to);

                    let now = queue.current_track().unwrap().id;
                    if from == current {
                        assert_eq!(now, moved_id);
                        assert_eq!(queue.current_index(), Some(to));
                    } else {
                        assert_eq!(
                            now, current_id,
                            "len={} from={} to={} current={}",
                            len, from, to, current
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn test_reorder_index_adjustments() {
    // from before current, to at current: current shifts down
    let mut queue = queue_at(&[1, 2, 3, 4], 2);
    queue.reorder(0, 2).unwrap();
    assert_eq!(ids(&queue), vec![2, 3, 1, 4]);
    assert_eq!(queue.current_index(), Some(1));

    // from after current, to at current: current shifts up
    let mut queue = queue_at(&[1, 2, 3, 4], 1);
    queue.reorder(3, 1).unwrap();
    assert_eq!(ids(&queue), vec![1, 4, 2, 3]);
    assert_eq!(queue.current_index(), Some(2));

    // both on the same side: untouched
    let mut queue = queue_at(&[1, 2, 3, 4], 0);
    queue.reorder(1, 3).unwrap();
    assert_eq!(queue.current_index(), Some(0));

    // moving the current track to the last boundary
    let mut queue = queue_at(&[1, 2, 3, 4], 0);
    queue.reorder(0, 3).unwrap();
    assert_eq!(ids(&queue), vec![2, 3, 4, 1]);
    assert_eq!(queue.current_index(), Some(3));
}

#[test]
fn test_reorder_out_of_range_is_rejected() {
    let mut queue = queue_at(&[1, 2, 3], 1);

    assert!(queue.reorder(3, 0).is_err());
    assert!(queue.reorder(0, 3).is_err());
    assert_eq!(ids(&queue), vec![1, 2, 3]);
    assert_eq!(queue.current_index(), Some(1));
}

#[test]
fn test_reorder_on_cleared_queue_is_rejected() {
    let mut queue = PlaybackQueue::new();
    queue.set_and_play(tracks(&[1, 2, 3]), 0).unwrap();
    queue.clear();
    assert!(queue.reorder(0, 1).is_err());
    assert!(queue.current_track().is_none());
}

#[test]
fn test_playing_another_list_replaces_queue() {
    let album = tracks(&[1, 2, 3]);
    let favorites = vec![track(10), track(11)];

    let mut queue = PlaybackQueue::new();
    queue.set_and_play(album, 1).unwrap();
    queue.set_and_play(favorites.clone(), 0).unwrap();

    assert_eq!(queue.tracks(), favorites.as_slice());
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.current_index(), Some(0));
}
