use anyhow::{bail, Result};
use clap::Subcommand;
use giveaway_execution::{Clock, Contest, ValidationOutcome};
use giveaway_types::{contest::demo_users, Snapshot, TelegramIdentity, User, UserId};
use rand::Rng;
use std::fmt::Write;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Register a participant from bridge identity fields
    Register {
        #[arg(long)]
        id: UserId,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        username: Option<String>,
        /// Identity of the referring participant
        #[arg(long)]
        referrer: Option<UserId>,
    },
    /// Mark a participant's subscription as confirmed
    Validate {
        #[arg(long)]
        id: UserId,
        /// Result of the external channel-membership check
        #[arg(long)]
        subscribed: bool,
    },
    /// Print a participant's referral link
    Link {
        #[arg(long)]
        id: UserId,
    },
    /// Print a participant record
    Show {
        #[arg(long)]
        id: UserId,
    },
    /// List participants
    Users {
        /// List everyone ever registered instead of the current contest
        #[arg(long)]
        all_time: bool,
    },
    /// Print contest counters
    Stats,
    /// Print or replace the "how it works" text
    Howto {
        #[arg(long)]
        set: Option<String>,
    },
    /// Print the last published results
    Results,
    /// Draw winners weighted by score
    Draw {
        #[arg(long, default_value = "1")]
        count: usize,
        /// Publish the winner list as the latest results
        #[arg(long)]
        publish: bool,
    },
    /// Publish results text
    Publish {
        #[arg(long)]
        text: String,
    },
    /// Clear participants, results and referral codes
    Reset {
        /// Required confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Print a JSON export of participants
    Export,
    /// Replace the participant list with the demo roster
    SeedDemo,
}

impl Command {
    /// Whether only the configured admin may run this command.
    pub fn is_admin_only(&self) -> bool {
        match self {
            Self::Howto { set } => set.is_some(),
            Self::Users { .. }
            | Self::Stats
            | Self::Draw { .. }
            | Self::Publish { .. }
            | Self::Reset { .. }
            | Self::Export
            | Self::SeedDemo => true,
            Self::Register { .. }
            | Self::Validate { .. }
            | Self::Link { .. }
            | Self::Show { .. }
            | Self::Results => false,
        }
    }
}

/// Run `command` on behalf of `caller`, returning the text to print.
pub fn execute<R: Rng, C: Clock>(
    contest: &mut Contest<R, C>,
    caller: Option<UserId>,
    command: Command,
) -> Result<String> {
    if command.is_admin_only() && !caller.is_some_and(|id| contest.is_admin(id)) {
        bail!("command requires the admin identity (pass --as {})", contest.admin_id());
    }

    let mut out = String::new();
    match command {
        Command::Register {
            id,
            first_name,
            last_name,
            username,
            referrer,
        } => {
            let identity = TelegramIdentity {
                id,
                first_name,
                last_name,
                username,
            };
            let user = contest.register(id, &identity.handle(), &identity.full_name(), referrer);
            write_user(&mut out, &user);
        }
        Command::Validate { id, subscribed } => {
            let message = match contest.validate_detailed(id, subscribed) {
                ValidationOutcome::NotSubscribed => "not subscribed to the channel".to_string(),
                ValidationOutcome::UnknownUser => format!("unknown user {id}"),
                ValidationOutcome::AlreadyValidated => "already validated".to_string(),
                ValidationOutcome::Validated { credited: Some(referrer) } => {
                    format!("validated; referrer {referrer} credited")
                }
                ValidationOutcome::Validated { credited: None } => "validated".to_string(),
            };
            out.push_str(&message);
            out.push('\n');
        }
        Command::Link { id } => {
            out.push_str(&contest.link_for(id));
            out.push('\n');
        }
        Command::Show { id } => match contest.find(id) {
            Some(user) => write_user(&mut out, user),
            None => bail!("unknown user {id}"),
        },
        Command::Users { all_time } => {
            let users = if all_time {
                contest.archive()
            } else {
                contest.users()
            };
            for user in users {
                write_user(&mut out, user);
            }
        }
        Command::Stats => {
            let stats = contest.stats();
            out.push_str(&serde_json::to_string_pretty(&stats)?);
            out.push('\n');
        }
        Command::Howto { set } => {
            if let Some(text) = set {
                contest.update_howto(text);
            }
            out.push_str(&contest.settings().howto);
            out.push('\n');
        }
        Command::Results => match contest.last_results() {
            Some(results) => {
                let _ = writeln!(out, "{}", results.date.to_rfc3339());
                out.push_str(&results.text);
                out.push('\n');
            }
            None => out.push_str("no results published\n"),
        },
        Command::Draw { count, publish } => {
            let winners = contest.draw_winners(count);
            let text = format_winners(&winners);
            if publish && !winners.is_empty() {
                contest.save_results(text.clone());
            }
            out.push_str(&text);
        }
        Command::Publish { text } => {
            let results = contest.save_results(text);
            let _ = writeln!(out, "published at {}", results.date.to_rfc3339());
        }
        Command::Reset { yes } => {
            if !yes {
                bail!("reset clears every participant; pass --yes to confirm");
            }
            let cleared = contest.users().len();
            contest.reset_contest();
            let _ = writeln!(out, "reset; cleared {cleared} participants");
        }
        Command::Export => {
            out.push_str(&serde_json::to_string_pretty(&contest.export())?);
            out.push('\n');
        }
        Command::SeedDemo => {
            let current = contest.snapshot();
            contest.restore(Snapshot {
                users: demo_users(),
                ..current
            })?;
            let _ = writeln!(out, "seeded {} demo participants", contest.users().len());
        }
    }
    Ok(out)
}

/// Results text listing winners in draw order.
pub fn format_winners(winners: &[User]) -> String {
    if winners.is_empty() {
        return "no eligible participants\n".to_string();
    }
    let mut out = String::from("🏆 Winners:\n");
    for (place, winner) in winners.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} ({} pts)",
            place + 1,
            winner.display_name(),
            winner.score
        );
    }
    out
}

fn write_user(out: &mut String, user: &User) {
    let _ = writeln!(
        out,
        "{}\t{}\t{}\tvalidated={}\tscore={}\tjoined={}{}",
        user.user_id,
        user.username,
        user.full_name,
        user.is_validated,
        user.score,
        user.join_date,
        user.referrer_id
            .map(|id| format!("\treferrer={id}"))
            .unwrap_or_default(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use giveaway_execution::mocks::seeded_contest;
    use giveaway_types::contest::DEFAULT_ADMIN_ID;

    const ADMIN: Option<UserId> = Some(DEFAULT_ADMIN_ID);

    fn register(id: UserId, referrer: Option<UserId>) -> Command {
        Command::Register {
            id,
            first_name: "Ivan".into(),
            last_name: Some("Petrov".into()),
            username: Some(format!("user{id}")),
            referrer,
        }
    }

    #[test]
    fn test_register_uses_bridge_fields() {
        let mut contest = seeded_contest(0);
        let out = execute(&mut contest, None, register(5, None)).unwrap();
        assert!(out.contains("@user5"));
        let user = contest.find(5).unwrap();
        assert_eq!(user.username, "@user5");
        assert_eq!(user.full_name, "Ivan Petrov");
    }

    #[test]
    fn test_validate_reports_credit() {
        let mut contest = seeded_contest(0);
        execute(&mut contest, None, register(1, None)).unwrap();
        execute(&mut contest, None, register(2, Some(1))).unwrap();

        let refused = Command::Validate {
            id: 2,
            subscribed: false,
        };
        let out = execute(&mut contest, None, refused).unwrap();
        assert_eq!(out, "not subscribed to the channel\n");

        let confirmed = Command::Validate {
            id: 2,
            subscribed: true,
        };
        let out = execute(&mut contest, None, confirmed.clone()).unwrap();
        assert_eq!(out, "validated; referrer 1 credited\n");
        let out = execute(&mut contest, None, confirmed).unwrap();
        assert_eq!(out, "already validated\n");
        assert_eq!(contest.find(1).unwrap().score, 1);
    }

    #[test]
    fn test_admin_commands_require_admin() {
        let mut contest = seeded_contest(0);
        let reset = Command::Reset { yes: true };
        assert!(execute(&mut contest, None, reset.clone()).is_err());
        assert!(execute(&mut contest, Some(1), reset.clone()).is_err());
        assert!(execute(&mut contest, ADMIN, reset).is_ok());

        // Reading the howto is open to everyone, changing it is not
        assert!(execute(&mut contest, None, Command::Howto { set: None }).is_ok());
        let change = Command::Howto {
            set: Some("new".into()),
        };
        assert!(execute(&mut contest, Some(1), change.clone()).is_err());
        assert_eq!(execute(&mut contest, ADMIN, change).unwrap(), "new\n");
    }

    #[test]
    fn test_reset_needs_confirmation() {
        let mut contest = seeded_contest(0);
        execute(&mut contest, None, register(1, None)).unwrap();
        assert!(execute(&mut contest, ADMIN, Command::Reset { yes: false }).is_err());
        assert_eq!(contest.users().len(), 1);
    }

    #[test]
    fn test_draw_and_publish() {
        let mut contest = seeded_contest(0);
        execute(&mut contest, ADMIN, Command::SeedDemo).unwrap();

        let out = execute(
            &mut contest,
            ADMIN,
            Command::Draw {
                count: 3,
                publish: true,
            },
        )
        .unwrap();
        assert!(out.starts_with("🏆 Winners:\n1. "));
        assert_eq!(out.lines().count(), 4);
        assert_eq!(contest.last_results().unwrap().text, out);
    }

    #[test]
    fn test_draw_on_empty_contest_publishes_nothing() {
        let mut contest = seeded_contest(0);
        let out = execute(
            &mut contest,
            ADMIN,
            Command::Draw {
                count: 2,
                publish: true,
            },
        )
        .unwrap();
        assert_eq!(out, "no eligible participants\n");
        assert!(contest.last_results().is_none());
    }

    #[test]
    fn test_link_is_open_to_participants() {
        let mut contest = seeded_contest(0);
        let first = execute(&mut contest, None, Command::Link { id: 9 }).unwrap();
        let second = execute(&mut contest, None, Command::Link { id: 9 }).unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("https://t.me/YourBotName?start=ref_"));
    }

    #[test]
    fn test_show_unknown_user_is_error() {
        let mut contest = seeded_contest(0);
        assert!(execute(&mut contest, None, Command::Show { id: 3 }).is_err());
    }

    #[test]
    fn test_seed_demo_keeps_settings() {
        let mut contest = seeded_contest(0);
        contest.update_howto("rules");
        execute(&mut contest, ADMIN, Command::SeedDemo).unwrap();
        assert_eq!(contest.users().len(), 8);
        assert_eq!(contest.settings().howto, "rules");

        let out = execute(&mut contest, ADMIN, Command::Export).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["total_score"], 29);
    }

    #[test]
    fn test_format_winners_uses_display_name() {
        let winners: Vec<User> = demo_users().into_iter().skip(6).take(1).collect();
        assert_eq!(
            format_winners(&winners),
            "🏆 Winners:\n1. Сергей Белов (6 pts)\n"
        );
    }
}
