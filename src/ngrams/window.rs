//! Fixed-width windows around a center token.
//!
//! A window of half-width `n` is the space-joined run of the `2n+1` token texts
//! centered on a position.
//! Positions falling outside of the document are replaced by a padding token,
//! so that a window always has exactly `2n+1` fields.
//!
//! ```text
//! Lorem ipsum dolor sit amet consectetur, n = 2
//!
//! position 0: inv inv Lorem ipsum dolor
//! position 1: inv Lorem ipsum dolor sit
//! position 3: ipsum dolor sit amet consectetur
//! ```
use std::iter;
use std::ops::Range;
use std::slice;

use itertools::Itertools;

use crate::annotation::TokenSequence;
use crate::error::Error;

/// Window of `2 * half_width + 1` fields centered on `position`.
///
/// Fails if `position` is not a valid position of `doc`.
pub fn window_at<D>(
    doc: &D,
    position: usize,
    half_width: usize,
    pad: &str,
) -> Result<String, Error>
where
    D: TokenSequence + ?Sized,
{
    let len = doc.len();
    if position >= len {
        return Err(Error::PositionOutOfBounds { position, len });
    }

    let left_padding = half_width.saturating_sub(position);
    let start = position.saturating_sub(half_width);
    let end = position.saturating_add(half_width).saturating_add(1);
    let right_padding = end.saturating_sub(len);

    let window = iter::repeat(pad)
        .take(left_padding)
        .chain((start..end.min(len)).map(|i| doc.token_text(i)))
        .chain(iter::repeat(pad).take(right_padding))
        .join(" ");

    Ok(window)
}

enum Positions<'f> {
    All(Range<usize>),
    Filtered(slice::Iter<'f, usize>),
}

impl Iterator for Positions<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        match self {
            Positions::All(r) => r.next(),
            Positions::Filtered(f) => f.next().copied(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Positions::All(r) => r.size_hint(),
            Positions::Filtered(f) => f.size_hint(),
        }
    }
}

/// Windows of a document, see [windows].
pub struct Windows<'d, 'f, D: ?Sized> {
    doc: &'d D,
    positions: Positions<'f>,
    half_width: usize,
    pad: &'d str,
}

impl<D> Iterator for Windows<'_, '_, D>
where
    D: TokenSequence + ?Sized,
{
    type Item = Result<String, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.positions
            .next()
            .map(|p| window_at(self.doc, p, self.half_width, self.pad))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

/// Windows centered on every position of `doc`, or on each entry of `filter` if provided.
///
/// With a filter, exactly one window is produced per entry, in filter order
/// (duplicates and non-contiguous positions included).
pub fn windows<'d, 'f, D>(
    doc: &'d D,
    half_width: usize,
    pad: &'d str,
    filter: Option<&'f [usize]>,
) -> Windows<'d, 'f, D>
where
    D: TokenSequence + ?Sized,
{
    let positions = match filter {
        Some(f) => Positions::Filtered(f.iter()),
        None => Positions::All(0..doc.len()),
    };

    Windows {
        doc,
        positions,
        half_width,
        pad,
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;

    use super::{window_at, windows};

    fn lorem() -> Vec<&'static str> {
        "Lorem ipsum dolor sit amet consectetur adipiscing elit sed do eiusmod tempor incididunt ut labore et dolore magna aliqua"
            .split(' ')
            .collect()
    }

    #[test]
    fn test_window_no_padding() {
        let d = lorem();
        assert_eq!(
            window_at(d.as_slice(), 3, 2, "inv").unwrap(),
            "ipsum dolor sit amet consectetur"
        );
    }

    #[test]
    fn test_window_left_padding() {
        let d = lorem();
        assert_eq!(
            window_at(d.as_slice(), 1, 2, "inv").unwrap(),
            "inv Lorem ipsum dolor sit"
        );
        assert_eq!(
            window_at(d.as_slice(), 0, 2, "inv").unwrap(),
            "inv inv Lorem ipsum dolor"
        );
    }

    #[test]
    fn test_window_right_padding() {
        let d = lorem();
        let last = d.len() - 1;
        assert_eq!(
            window_at(d.as_slice(), last, 2, "inv").unwrap(),
            "dolore magna aliqua inv inv"
        );
        assert_eq!(
            window_at(d.as_slice(), last - 1, 2, "inv").unwrap(),
            "et dolore magna aliqua inv"
        );
    }

    #[test]
    fn test_window_both_sides_padded() {
        let d = ["a", "b"];
        assert_eq!(window_at(&d[..], 0, 3, "_").unwrap(), "_ _ _ a b _ _");
        assert_eq!(window_at(&d[..], 1, 0, "_").unwrap(), "b");
    }

    #[test]
    fn test_window_field_count() {
        let d = lorem();
        for n in 0..6 {
            for p in 0..d.len() {
                let w = window_at(d.as_slice(), p, n, "inv").unwrap();
                assert_eq!(w.split(' ').count(), 2 * n + 1);
            }
        }
    }

    #[test]
    fn test_window_out_of_bounds() {
        let d = ["a", "b"];
        assert!(matches!(
            window_at(&d[..], 2, 2, "inv"),
            Err(Error::PositionOutOfBounds {
                position: 2,
                len: 2
            })
        ));
    }

    #[test]
    fn test_windows_unfiltered() {
        let d = lorem();
        let res: Vec<String> = windows(d.as_slice(), 2, "inv", None)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(res.len(), d.len());
        for (i, w) in res.iter().enumerate() {
            assert_eq!(w, &window_at(d.as_slice(), i, 2, "inv").unwrap());
        }
        assert_eq!(res[res.len() - 1], "dolore magna aliqua inv inv");
    }

    #[test]
    fn test_windows_filtered() {
        let d = lorem();
        let filter = [5, 1, 5];
        let res: Vec<String> = windows(d.as_slice(), 1, "inv", Some(&filter))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            res,
            vec![
                "amet consectetur adipiscing",
                "Lorem ipsum dolor",
                "amet consectetur adipiscing"
            ]
        );
    }

    #[test]
    fn test_windows_empty_filter_and_doc() {
        let d = lorem();
        assert_eq!(windows(d.as_slice(), 2, "inv", Some(&[])).count(), 0);
        let empty: [&str; 0] = [];
        assert_eq!(windows(&empty[..], 2, "inv", None).count(), 0);
    }

    #[test]
    fn test_windows_invalid_filter() {
        let d = ["a"];
        let res: Result<Vec<String>, _> = windows(&d[..], 2, "inv", Some(&[0, 4])).collect();
        assert!(res.is_err());
    }
}
