//! Property-based tests for the board's aggregation laws.

use hotnot_board::{
    Assessment, Board, BoardConfig, Identity, SlotAddress, Submission, TopicTitle,
    render_markdown,
};
use proptest::prelude::*;

// Strategy for generating valid topic titles
fn topic_title() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,8}".prop_map(|s| s.to_string())
}

// Strategy for generating identity tokens (hex, like resolved ones)
fn identity_token() -> impl Strategy<Value = String> {
    "[0-9a-f]{8,40}".prop_map(|s| s.to_string())
}

fn assessment() -> impl Strategy<Value = Option<Assessment>> {
    proptest::option::of(prop_oneof![
        Just(Assessment::Hot),
        Just(Assessment::Not),
        Just(Assessment::Shrug),
    ])
}

/// One visitor action: (topic index, visitor index, comment?, assessment).
fn action() -> impl Strategy<Value = (usize, usize, bool, Option<Assessment>)> {
    (0usize..4, 0usize..4, proptest::bool::ANY, assessment())
}

fn populate(
    board: &Board,
    topics: &[TopicTitle],
    visitors: &[Identity],
    actions: &[(usize, usize, bool, Option<Assessment>)],
) {
    for title in topics {
        board
            .save(title, &visitors[0], &Submission::from_form("edit", "# body\n", "").unwrap())
            .unwrap();
    }
    for &(t, v, with_comment, verdict) in actions {
        let title = &topics[t % topics.len()];
        let visitor = &visitors[v % visitors.len()];
        if with_comment {
            let submission = Submission {
                kind: "comment".parse().unwrap(),
                markdown: "a comment".to_string(),
                assessment: verdict,
            };
            board.save(title, visitor, &submission).unwrap();
        } else if let Some(verdict) = verdict {
            board.store().put_assessment(title, visitor, verdict).unwrap();
        }
    }
}

fn scratch_board() -> (tempfile::TempDir, Board) {
    let dir = tempfile::tempdir().unwrap();
    let board = Board::open(
        BoardConfig::new(dir.path().join("data")).with_users_dir(dir.path().join("users")),
    );
    (dir, board)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn partition_and_hotness_laws(
        titles in prop::collection::btree_set(topic_title(), 1..4),
        addresses in prop::collection::btree_set(0u8..=255, 1..4),
        actions in prop::collection::vec(action(), 0..16),
    ) {
        let (_dir, board) = scratch_board();
        let topics: Vec<TopicTitle> = titles.iter().map(|t| TopicTitle::parse(t).unwrap()).collect();
        let visitors: Vec<Identity> = addresses
            .iter()
            .map(|octet| board.resolve_identity(&format!("10.0.0.{}:80", octet)))
            .collect();
        populate(&board, &topics, &visitors, &actions);

        for viewer in &visitors {
            let listing = board.list_topics(viewer).unwrap();
            prop_assert_eq!(listing.current.len() + listing.old.len(), topics.len());

            for title in &topics {
                let in_current = listing.current.iter().filter(|s| &s.title == title).count();
                let in_old = listing.old.iter().filter(|s| &s.title == title).count();
                prop_assert_eq!(in_current + in_old, 1);

                let commented = board.store().get_comment(title, viewer).unwrap().is_some();
                prop_assert_eq!(in_old == 1, commented);
            }

            for summary in listing.current.iter().chain(listing.old.iter()) {
                prop_assert_eq!(
                    summary.hot_count + summary.not_count + summary.shrug_count,
                    summary.comment_count
                );
                if summary.comment_count == 0 {
                    prop_assert_eq!(summary.hotness_percent, 0);
                }
                if summary.comment_count > 0 && summary.hot_count == summary.comment_count {
                    prop_assert_eq!(summary.hotness_percent, 100);
                }
                prop_assert!(summary.hotness_percent <= 100);
            }

            prop_assert_eq!(board.list_topics(viewer).unwrap(), listing);
        }
    }

    #[test]
    fn slot_addresses_parse_back(
        title in topic_title(),
        token in identity_token(),
    ) {
        let topic = TopicTitle::parse(&title).unwrap();
        let identity = Identity::parse(&token).unwrap();

        for slot in [
            SlotAddress::Body(topic.clone()),
            SlotAddress::Comment(topic.clone(), identity.clone()),
            SlotAddress::Assessment(topic.clone(), identity.clone()),
        ] {
            prop_assert_eq!(SlotAddress::parse_file_name(&slot.file_name()), Some(slot));
        }
    }

    #[test]
    fn rendering_never_leaks_script_tags(
        prefix in "[a-zA-Z *_#\\-\n]{0,40}",
        suffix in "[a-zA-Z *_#\\-\n]{0,40}",
    ) {
        let markdown = format!("{}<script>alert(1)</script>{}", prefix, suffix);
        let html = render_markdown("fuzz", &markdown);
        prop_assert!(!html.contains("<script"));
    }
}
