//! Demo data - sample users, posts, and follow edges
//!
//! Pure data used by the DemoService to populate a fresh demo database.

/// Password shared by all demo users
pub const DEMO_PASSWORD: &str = "demo";

/// A sample user
pub struct DemoUser {
    pub username: &'static str,
    pub email: &'static str,
    pub about_me: &'static str,
}

/// Sample users, in registration order
pub fn demo_users() -> &'static [DemoUser] {
    &[
        DemoUser {
            username: "alice",
            email: "alice@example.com",
            about_me: "Gardener, occasional poster.",
        },
        DemoUser {
            username: "bob",
            email: "bob@example.com",
            about_me: "Mostly here for the feeds.",
        },
        DemoUser {
            username: "carol",
            email: "carol@example.com",
            about_me: "Writes short. Reads long.",
        },
    ]
}

/// Sample posts as (author, body), oldest first
pub fn demo_posts() -> &'static [(&'static str, &'static str)] {
    &[
        ("alice", "The tomatoes finally sprouted!"),
        ("bob", "Anyone else refresh their own profile page?"),
        ("carol", "Drafting something longer than 140 characters, again."),
        ("alice", "Rain all week. The garden approves."),
        ("bob", "Following carol was a good decision."),
    ]
}

/// Sample follow edges as (follower, followed)
pub fn demo_follows() -> &'static [(&'static str, &'static str)] {
    &[
        ("alice", "bob"),
        ("bob", "alice"),
        ("bob", "carol"),
        ("carol", "alice"),
    ]
}
