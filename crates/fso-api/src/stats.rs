//! Summary statistics over already-loaded blog lists.
//!
//! Everything here is a pure function of a borrowed slice. An empty slice
//! yields `0` or `None`; ties go to the record or author seen first. Sums
//! saturate at the numeric maximum instead of overflowing.

use std::collections::HashMap;

use fso_types::api::{AuthorBlogs, AuthorLikes};
use fso_types::models::Blog;

/// Anything with an author and a like count.
pub trait Engagement {
    fn author(&self) -> &str;
    fn likes(&self) -> i64;
}

impl Engagement for Blog {
    fn author(&self) -> &str {
        &self.author
    }

    fn likes(&self) -> i64 {
        self.likes
    }
}

pub fn total_likes<T: Engagement>(posts: &[T]) -> i64 {
    posts
        .iter()
        .map(Engagement::likes)
        .fold(0, i64::saturating_add)
}

pub fn favorite_blog<T: Engagement>(posts: &[T]) -> Option<&T> {
    posts
        .iter()
        .reduce(|best, post| if post.likes() > best.likes() { post } else { best })
}

pub fn most_blogs<T: Engagement>(posts: &[T]) -> Option<AuthorBlogs> {
    leader(posts, |_| 1usize).map(|(author, blogs)| AuthorBlogs {
        author: author.to_string(),
        blogs,
    })
}

pub fn most_likes<T: Engagement>(posts: &[T]) -> Option<AuthorLikes> {
    leader(posts, Engagement::likes).map(|(author, likes)| AuthorLikes {
        author: author.to_string(),
        likes,
    })
}

/// A per-author running total.
trait Tally: Copy + Default + Ord {
    fn tally(self, weight: Self) -> Self;
}

impl Tally for usize {
    fn tally(self, weight: Self) -> Self {
        self.saturating_add(weight)
    }
}

impl Tally for i64 {
    fn tally(self, weight: Self) -> Self {
        self.saturating_add(weight)
    }
}

/// Sums `weight` per author and returns the author with the largest total.
fn leader<'a, T, N>(posts: &'a [T], weight: impl Fn(&T) -> N) -> Option<(&'a str, N)>
where
    T: Engagement,
    N: Tally,
{
    let mut totals: Vec<(&'a str, N)> = Vec::new();
    let mut slots: HashMap<&'a str, usize> = HashMap::new();

    for post in posts {
        let author = post.author();
        let slot = *slots.entry(author).or_insert_with(|| {
            totals.push((author, N::default()));
            totals.len() - 1
        });
        totals[slot].1 = totals[slot].1.tally(weight(post));
    }

    totals.into_iter().fold(None, |best, (author, total)| match best {
        Some((_, top)) if top >= total => best,
        _ => Some((author, total)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Post {
        title: &'static str,
        author: &'static str,
        likes: i64,
    }

    impl Engagement for Post {
        fn author(&self) -> &str {
            self.author
        }

        fn likes(&self) -> i64 {
            self.likes
        }
    }

    fn post(title: &'static str, author: &'static str, likes: i64) -> Post {
        Post {
            title,
            author,
            likes,
        }
    }

    fn bigger_list() -> Vec<Post> {
        vec![
            post("A", "Alice", 1),
            post("B", "Bob", 2),
            post("C", "Alice", 4),
            post("D", "Bob", 3),
            post("E", "Charlie", 10),
        ]
    }

    #[test]
    fn empty_list_yields_sentinels() {
        let empty: Vec<Post> = Vec::new();
        assert_eq!(total_likes(&empty), 0);
        assert_eq!(favorite_blog(&empty), None);
        assert_eq!(most_blogs(&empty), None);
        assert_eq!(most_likes(&empty), None);
    }

    #[test]
    fn total_of_one_is_its_likes() {
        assert_eq!(total_likes(&[post("E", "Charlie", 5)]), 5);
    }

    #[test]
    fn total_of_bigger_list() {
        assert_eq!(total_likes(&bigger_list()), 20);
    }

    #[test]
    fn favorite_has_most_likes() {
        let posts = bigger_list();
        assert_eq!(favorite_blog(&posts), Some(&post("E", "Charlie", 10)));
    }

    #[test]
    fn favorite_on_tie_has_the_maximum() {
        let posts = vec![
            post("A", "Alice", 7),
            post("B", "Bob", 7),
            post("C", "Charlie", 3),
        ];
        let favorite = favorite_blog(&posts).unwrap();
        assert_eq!(favorite.likes, 7);
        assert!(["A", "B"].contains(&favorite.title));
    }

    #[test]
    fn author_leaders_on_the_reference_list() {
        let posts = vec![
            post("1", "Charlie", 13),
            post("2", "Bob", 2),
            post("3", "Charlie", 10),
            post("4", "Alice", 4),
            post("5", "Bob", 3),
            post("6", "Alice", 1),
            post("7", "Charlie", 22),
        ];

        assert_eq!(
            most_blogs(&posts),
            Some(AuthorBlogs {
                author: "Charlie".into(),
                blogs: 3
            })
        );
        assert_eq!(
            most_likes(&posts),
            Some(AuthorLikes {
                author: "Charlie".into(),
                likes: 45
            })
        );
    }

    #[test]
    fn author_ties_return_a_maximal_author() {
        let posts = bigger_list();

        let blogs = most_blogs(&posts).unwrap();
        assert_eq!(blogs.blogs, 2);
        assert!(["Alice", "Bob"].contains(&blogs.author.as_str()));

        let likes = most_likes(&[post("A", "Alice", 5), post("B", "Bob", 5)]).unwrap();
        assert_eq!(likes.likes, 5);
    }

    #[test]
    fn single_author_with_zero_likes_still_leads() {
        let posts = [post("A", "Alice", 0)];
        assert_eq!(
            most_likes(&posts),
            Some(AuthorLikes {
                author: "Alice".into(),
                likes: 0
            })
        );
    }

    #[test]
    fn huge_like_counts_saturate_instead_of_overflowing() {
        let posts = [
            post("A", "Alice", i64::MAX),
            post("B", "Alice", 1),
            post("C", "Bob", 7),
        ];
        assert_eq!(total_likes(&posts), i64::MAX);
        assert_eq!(
            most_likes(&posts),
            Some(AuthorLikes {
                author: "Alice".into(),
                likes: i64::MAX
            })
        );
        assert_eq!(favorite_blog(&posts), Some(&post("A", "Alice", i64::MAX)));
    }

    #[test]
    fn input_is_left_untouched() {
        let posts = bigger_list();
        let _ = most_likes(&posts);
        let _ = favorite_blog(&posts);
        assert_eq!(posts, bigger_list());
    }
}
