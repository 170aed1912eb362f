//! Grid packing and pagination scenarios
//!
//! Run with: cargo test --test layout_test

use roomkit::layout::{
    calculate_layout_sizes, chunk, chunk_elements, get_mode_aspect_ratio,
    get_video_tracks_from_peers, largest_rect, AspectRatio, LayoutConstraint, LayoutRequest, Peer,
    TileSizes, TrackInfo, TrackSource, TrackWithPeer,
};
use roomkit::RoomkitError;
use std::collections::HashMap;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn request(count: usize, width: f64, height: f64, constraint: LayoutConstraint) -> LayoutRequest {
    LayoutRequest {
        count,
        parent_width: width,
        parent_height: height,
        aspect_ratio: AspectRatio::new(16.0, 9.0),
        constraint,
    }
}

#[test]
fn test_four_tiles_pack_two_by_two() {
    let fit = largest_rect(400.0, 300.0, 4.0, Some(16.0), Some(9.0)).unwrap();
    assert_eq!((fit.cols, fit.rows), (2, 2));
    assert!(close(fit.width, 200.0));
    assert!(close(fit.height, 112.5));
    assert!(close(fit.area, 200.0 * 112.5));
}

#[test]
fn test_single_tile_fills_matching_container() {
    let fit = largest_rect(1280.0, 720.0, 1.0, Some(16.0), Some(9.0)).unwrap();
    assert_eq!((fit.cols, fit.rows), (1, 1));
    assert!(close(fit.width, 1280.0));
    assert!(close(fit.height, 720.0));
}

#[test]
fn test_tall_container_stacks_tiles() {
    let fit = largest_rect(320.0, 1000.0, 3.0, Some(16.0), Some(9.0)).unwrap();
    assert_eq!((fit.cols, fit.rows), (1, 3));
    assert!(close(fit.width, 320.0));
    assert!(close(fit.height, 180.0));
}

#[test]
fn test_largest_rect_errors() {
    let err = largest_rect(-1.0, 100.0, 2.0, Some(1.0), Some(1.0)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid layout request: Container must have a non-negative area"
    );

    for n in [0.0, -3.0, 2.5, f64::NAN] {
        match largest_rect(100.0, 100.0, n, Some(1.0), Some(1.0)) {
            Err(RoomkitError::InvalidLayout(msg)) => {
                assert_eq!(msg, "Number of shapes to place must be a positive integer")
            }
            other => panic!("expected InvalidLayout for {}, got {:?}", n, other),
        }
    }

    match largest_rect(100.0, 100.0, 2.0, Some(f64::NAN), Some(9.0)) {
        Err(RoomkitError::InvalidLayout(msg)) => assert_eq!(msg, "Aspect ratio must be a number"),
        other => panic!("expected InvalidLayout, got {:?}", other),
    }
}

#[test]
fn test_largest_rect_without_aspect_ratio() {
    let fit = largest_rect(100.0, 100.0, 2.0, None, Some(9.0)).unwrap();
    assert_eq!(fit.area, 0.0);
    let fit = largest_rect(100.0, 100.0, 2.0, Some(16.0), Some(0.0)).unwrap();
    assert_eq!(fit.area, 0.0);
}

#[test]
fn test_zero_participants() {
    let sizes =
        calculate_layout_sizes(&request(0, 1280.0, 720.0, LayoutConstraint::MaxTiles(9))).unwrap();
    assert_eq!(sizes, TileSizes::default());
}

#[test]
fn test_ten_tiles_four_per_page() {
    let sizes =
        calculate_layout_sizes(&request(10, 400.0, 300.0, LayoutConstraint::MaxTiles(4))).unwrap();
    assert_eq!(sizes.tiles_in_first_page, 4);
    assert!(close(sizes.default_width, 200.0));
    assert!(close(sizes.default_height, 112.5));
    assert!(sizes.is_last_page_different_from_first_page);

    let two = largest_rect(400.0, 300.0, 2.0, Some(16.0), Some(9.0)).unwrap();
    assert!(close(sizes.last_page_width, two.width));
    assert!(close(sizes.last_page_height, two.height));
}

#[test]
fn test_unconstrained_puts_everything_on_one_page() {
    let sizes =
        calculate_layout_sizes(&request(7, 1280.0, 720.0, LayoutConstraint::Unconstrained))
            .unwrap();
    assert_eq!(sizes.tiles_in_first_page, 7);
    assert!(!sizes.is_last_page_different_from_first_page);
    let fit = largest_rect(1280.0, 720.0, 7.0, Some(16.0), Some(9.0)).unwrap();
    assert_eq!(sizes.default_width, fit.width);
}

#[test]
fn test_paginate_with_remainder_sizes() {
    let sizes =
        calculate_layout_sizes(&request(10, 400.0, 300.0, LayoutConstraint::MaxTiles(4))).unwrap();
    let names: Vec<String> = (0..10).map(|i| format!("peer-{}", i)).collect();
    let pages = chunk_elements(&names, &sizes, false);

    let lens: Vec<usize> = pages.iter().map(Vec::len).collect();
    assert_eq!(lens, vec![4, 4, 2]);
    assert!(pages[0].iter().all(|t| t.width == sizes.default_width));
    assert!(pages[1].iter().all(|t| t.width == sizes.default_width));
    assert!(pages[2].iter().all(|t| t.width == sizes.last_page_width));
    assert_eq!(pages[2][1].element, "peer-9");

    let first_only = chunk_elements(&names, &sizes, true);
    assert_eq!(first_only.len(), 1);
    assert_eq!(first_only[0].len(), 4);
}

#[test]
fn test_chunk_examples() {
    assert_eq!(chunk(&[1, 2, 3, 4, 5], 2, false), vec![vec![1, 2], vec![3, 4], vec![5]]);
    assert_eq!(chunk(&[1, 2, 3, 4, 5], 2, true), vec![vec![1, 2]]);
    assert!(chunk::<i32>(&[], 3, false).is_empty());
    assert!(chunk(&[1, 2], 0, false).is_empty());
}

#[test]
fn test_mode_aspect_ratio_from_peers() {
    let mut tracks = HashMap::new();
    tracks.insert("v1".to_string(), TrackInfo::video("v1", 1280, 720));
    tracks.insert("v2".to_string(), TrackInfo::video("v2", 640, 360));
    tracks.insert("v3".to_string(), TrackInfo::video("v3", 640, 480));
    tracks.insert(
        "s1".to_string(),
        TrackInfo::video("s1", 1000, 1000).with_source(TrackSource::Screen),
    );
    let peers: Vec<Peer> = ["v1", "v2", "v3"]
        .iter()
        .enumerate()
        .map(|(i, track)| Peer {
            id: format!("p{}", i),
            name: format!("Peer {}", i),
            video_track: Some(track.to_string()),
            auxiliary_tracks: if i == 2 { vec!["s1".to_string()] } else { Vec::new() },
            ..Peer::default()
        })
        .collect();

    let tiles = get_video_tracks_from_peers(&peers, &tracks, |_| true);
    assert_eq!(tiles.len(), 4);
    assert_eq!(get_mode_aspect_ratio(&tiles), Some(1280.0 / 720.0));
}

#[test]
fn test_mode_aspect_ratio_tie_keeps_first_seen() {
    let tiles = vec![
        TrackWithPeer {
            track: Some(TrackInfo::video("a", 4, 3)),
            peer: Peer::default(),
        },
        TrackWithPeer {
            track: Some(TrackInfo::video("b", 16, 9)),
            peer: Peer::default(),
        },
    ];
    assert_eq!(get_mode_aspect_ratio(&tiles), Some(4.0 / 3.0));
}
