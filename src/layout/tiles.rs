//! Tile selection from room state and aspect-ratio inference

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Audio,
    Video,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackSource {
    Regular,
    Screen,
    Plugin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackInfo {
    pub id: String,
    pub kind: TrackKind,
    pub source: TrackSource,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl TrackInfo {
    pub fn video(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            kind: TrackKind::Video,
            source: TrackSource::Regular,
            width: Some(width),
            height: Some(height),
        }
    }

    pub fn audio(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: TrackKind::Audio,
            source: TrackSource::Regular,
            width: None,
            height: None,
        }
    }

    pub fn with_source(mut self, source: TrackSource) -> Self {
        self.source = source;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Peer {
    pub id: String,
    pub name: String,
    pub video_track: Option<String>,
    pub audio_track: Option<String>,
    pub auxiliary_tracks: Vec<String>,
}

/// One grid tile: a peer, and the video track shown in it if any
#[derive(Debug, Clone, PartialEq)]
pub struct TrackWithPeer {
    pub track: Option<TrackInfo>,
    pub peer: Peer,
}

/// Most frequent value; among equally frequent values the first seen wins
pub fn mode(values: &[f64]) -> Option<f64> {
    let mut counts: HashMap<u64, (usize, usize)> = HashMap::new();
    for (index, value) in values.iter().enumerate() {
        counts.entry(value.to_bits()).or_insert((0, index)).0 += 1;
    }
    counts
        .into_values()
        .max_by(|(count_a, first_a), (count_b, first_b)| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(_, first)| values[first])
}

/// Aspect ratio shared by most tiles that carry a track with known
/// dimensions, or `None` if no tile does.
pub fn get_mode_aspect_ratio(tiles: &[TrackWithPeer]) -> Option<f64> {
    let ratios: Vec<f64> = tiles
        .iter()
        .filter_map(|tile| tile.track.as_ref())
        .filter_map(|track| match (track.width, track.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some(f64::from(w) / f64::from(h)),
            _ => None,
        })
        .collect();
    mode(&ratios)
}

/// Build the tile list for a set of peers.
///
/// A peer with a known video track gets a video tile; a peer with no video
/// track but a known audio track gets an audio-only tile. When `show_screen`
/// accepts the peer, its first auxiliary screenshare video track gets an
/// extra tile. Audio-only screenshares get none.
pub fn get_video_tracks_from_peers<F>(
    peers: &[Peer],
    tracks: &HashMap<String, TrackInfo>,
    show_screen: F,
) -> Vec<TrackWithPeer>
where
    F: Fn(&Peer) -> bool,
{
    let mut tiles = Vec::new();
    for peer in peers {
        match &peer.video_track {
            None => {
                let has_audio = peer
                    .audio_track
                    .as_ref()
                    .is_some_and(|id| tracks.contains_key(id));
                if has_audio {
                    tiles.push(TrackWithPeer {
                        track: None,
                        peer: peer.clone(),
                    });
                }
            }
            Some(video_id) => {
                if let Some(track) = tracks.get(video_id) {
                    tiles.push(TrackWithPeer {
                        track: Some(track.clone()),
                        peer: peer.clone(),
                    });
                }
            }
        }

        if show_screen(peer) && !peer.auxiliary_tracks.is_empty() {
            let screenshare = peer
                .auxiliary_tracks
                .iter()
                .filter_map(|id| tracks.get(id))
                .find(|t| t.kind == TrackKind::Video && t.source == TrackSource::Screen);
            if let Some(track) = screenshare {
                tiles.push(TrackWithPeer {
                    track: Some(track.clone()),
                    peer: peer.clone(),
                });
            }
        }
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(track: Option<TrackInfo>) -> TrackWithPeer {
        TrackWithPeer {
            track,
            peer: Peer::default(),
        }
    }

    #[test]
    fn test_mode() {
        assert_eq!(mode(&[]), None);
        assert_eq!(mode(&[1.0, 2.0, 2.0]), Some(2.0));
        assert_eq!(mode(&[3.0, 1.0, 1.0, 3.0]), Some(3.0));
    }

    #[test]
    fn test_mode_aspect_ratio() {
        let tiles = vec![
            tile(Some(TrackInfo::video("a", 16, 9))),
            tile(Some(TrackInfo::video("b", 16, 9))),
            tile(Some(TrackInfo::video("c", 4, 3))),
        ];
        assert_eq!(get_mode_aspect_ratio(&tiles), Some(16.0 / 9.0));
    }

    #[test]
    fn test_mode_aspect_ratio_without_dimensions() {
        assert_eq!(get_mode_aspect_ratio(&[]), None);
        let tiles = vec![tile(None), tile(Some(TrackInfo::audio("a")))];
        assert_eq!(get_mode_aspect_ratio(&tiles), None);
    }

    fn room() -> (Vec<Peer>, HashMap<String, TrackInfo>) {
        let mut tracks = HashMap::new();
        tracks.insert("v1".to_string(), TrackInfo::video("v1", 1280, 720));
        tracks.insert("a2".to_string(), TrackInfo::audio("a2"));
        tracks.insert(
            "s1".to_string(),
            TrackInfo::video("s1", 1920, 1080).with_source(TrackSource::Screen),
        );
        tracks.insert(
            "sa1".to_string(),
            TrackInfo::audio("sa1").with_source(TrackSource::Screen),
        );
        let peers = vec![
            Peer {
                id: "p1".to_string(),
                video_track: Some("v1".to_string()),
                auxiliary_tracks: vec!["sa1".to_string(), "s1".to_string()],
                ..Peer::default()
            },
            Peer {
                id: "p2".to_string(),
                audio_track: Some("a2".to_string()),
                ..Peer::default()
            },
            Peer {
                id: "p3".to_string(),
                video_track: Some("unknown".to_string()),
                ..Peer::default()
            },
        ];
        (peers, tracks)
    }

    #[test]
    fn test_tiles_from_peers() {
        let (peers, tracks) = room();
        let tiles = get_video_tracks_from_peers(&peers, &tracks, |_| false);
        let ids: Vec<&str> = tiles.iter().map(|t| t.peer.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
        assert!(tiles[1].track.is_none());
    }

    #[test]
    fn test_screenshare_tile() {
        let (peers, tracks) = room();
        let tiles = get_video_tracks_from_peers(&peers, &tracks, |p| p.id == "p1");
        assert_eq!(tiles.len(), 3);
        assert_eq!(tiles[1].track.as_ref().map(|t| t.id.as_str()), Some("s1"));
    }

    #[test]
    fn test_audio_only_screenshare_has_no_tile() {
        let mut tracks = HashMap::new();
        tracks.insert(
            "sa".to_string(),
            TrackInfo::audio("sa").with_source(TrackSource::Screen),
        );
        let peers = vec![Peer {
            id: "p".to_string(),
            auxiliary_tracks: vec!["sa".to_string()],
            ..Peer::default()
        }];
        assert!(get_video_tracks_from_peers(&peers, &tracks, |_| true).is_empty());
    }
}
