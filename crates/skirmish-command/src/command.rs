//! Typed commands and their canonical wire encoding.

use std::fmt;

use skirmish_model::{ClientIndex, ColorRamp, SlotKey};

/// A single intent, in the form the authoritative server parses.
///
/// Client indices and slot keys are opaque tokens assumed to be valid
/// already. Encoding is deterministic: the same command always yields the
/// same string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// `slot <key>` — move the local client into a slot.
    Slot { slot: SlotKey },

    /// `slot_bot <key> <bot>` — put a bot of the given type into a slot.
    SlotBot { slot: SlotKey, bot: String },

    /// `slot_close <key>`
    SlotClose { slot: SlotKey },

    /// `slot_open <key>`
    SlotOpen { slot: SlotKey },

    /// `spawn <client> <point>`; point 0 clears the choice.
    Spawn { client: ClientIndex, point: u8 },

    /// `color <client> <ramp>`
    Color { client: ClientIndex, color: ColorRamp },

    /// `team <client> <team>`; team 0 leaves all teams.
    Team { client: ClientIndex, team: u8 },

    /// `race <client> <faction>`
    Race { client: ClientIndex, faction: String },

    /// `name <text>` — renames the local client. The name runs to the end
    /// of the line, so it may contain spaces.
    Name { name: String },

    /// `kick <client>`
    Kick { client: ClientIndex },

    /// `ready` — toggles the local client's readiness.
    Ready,

    /// `spectate` — leaves the current slot.
    Spectate,

    /// `allowcheats <bool>`
    AllowCheats { allow: bool },

    /// `startgame`
    StartGame,

    /// `map <uid>`
    Map { uid: String },
}

impl Command {
    /// The leading token of the encoded command.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Slot { .. } => "slot",
            Self::SlotBot { .. } => "slot_bot",
            Self::SlotClose { .. } => "slot_close",
            Self::SlotOpen { .. } => "slot_open",
            Self::Spawn { .. } => "spawn",
            Self::Color { .. } => "color",
            Self::Team { .. } => "team",
            Self::Race { .. } => "race",
            Self::Name { .. } => "name",
            Self::Kick { .. } => "kick",
            Self::Ready => "ready",
            Self::Spectate => "spectate",
            Self::AllowCheats { .. } => "allowcheats",
            Self::StartGame => "startgame",
            Self::Map { .. } => "map",
        }
    }

    /// Encodes the command into the string the server parses.
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = self.verb();
        match self {
            Self::Slot { slot } | Self::SlotClose { slot } | Self::SlotOpen { slot } => {
                write!(f, "{verb} {slot}")
            }
            Self::SlotBot { slot, bot } => write!(f, "{verb} {slot} {bot}"),
            Self::Spawn { client, point } => write!(f, "{verb} {client} {point}"),
            Self::Color { client, color } => write!(f, "{verb} {client} {color}"),
            Self::Team { client, team } => write!(f, "{verb} {client} {team}"),
            Self::Race { client, faction } => write!(f, "{verb} {client} {faction}"),
            Self::Name { name } => {
                // Line breaks would end the command early on the server.
                let name: String = name.chars().filter(|c| !c.is_control()).collect();
                write!(f, "{verb} {name}")
            }
            Self::Kick { client } => write!(f, "{verb} {client}"),
            Self::AllowCheats { allow } => write!(f, "{verb} {allow}"),
            Self::Map { uid } => write!(f, "{verb} {uid}"),
            Self::Ready | Self::Spectate | Self::StartGame => f.write_str(verb),
        }
    }
}

/// What the transport carries to the server on behalf of the lobby.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Order {
    /// A lobby command.
    Command(Command),

    /// A chat line, to everyone or to the sender's team only.
    Chat { team: bool, text: String },
}

impl From<Command> for Order {
    fn from(command: Command) -> Self {
        Self::Command(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_model::RampPoint;

    fn idx(i: u32) -> ClientIndex {
        ClientIndex(i)
    }

    // =====================================================================
    // One test per template
    // =====================================================================

    #[test]
    fn test_encode_slot() {
        let cmd = Command::Slot {
            slot: SlotKey::from("Multi0"),
        };
        assert_eq!(cmd.encode(), "slot Multi0");
    }

    #[test]
    fn test_encode_slot_bot() {
        let cmd = Command::SlotBot {
            slot: SlotKey::from("Multi3"),
            bot: "HardAI".into(),
        };
        assert_eq!(cmd.encode(), "slot_bot Multi3 HardAI");
    }

    #[test]
    fn test_encode_slot_open_and_close() {
        let key = SlotKey::from("Multi1");
        assert_eq!(
            Command::SlotClose { slot: key.clone() }.encode(),
            "slot_close Multi1"
        );
        assert_eq!(Command::SlotOpen { slot: key }.encode(), "slot_open Multi1");
    }

    #[test]
    fn test_encode_spawn() {
        let cmd = Command::Spawn {
            client: idx(3),
            point: 2,
        };
        assert_eq!(cmd.encode(), "spawn 3 2");
    }

    #[test]
    fn test_encode_spawn_clear() {
        let cmd = Command::Spawn {
            client: idx(0),
            point: 0,
        };
        assert_eq!(cmd.encode(), "spawn 0 0");
    }

    #[test]
    fn test_encode_color_ramp_is_one_token() {
        let cmd = Command::Color {
            client: idx(1),
            color: ColorRamp::new(RampPoint::new(75, 255, 180), RampPoint::new(75, 255, 30)),
        };
        let encoded = cmd.encode();
        assert_eq!(encoded, "color 1 75,255,180,75,255,30");
        assert_eq!(encoded.split(' ').count(), 3);
    }

    #[test]
    fn test_encode_team() {
        let cmd = Command::Team {
            client: idx(4),
            team: 2,
        };
        assert_eq!(cmd.encode(), "team 4 2");
    }

    #[test]
    fn test_encode_race() {
        let cmd = Command::Race {
            client: idx(2),
            faction: "nod".into(),
        };
        assert_eq!(cmd.encode(), "race 2 nod");
    }

    #[test]
    fn test_encode_name_keeps_spaces_strips_newlines() {
        let cmd = Command::Name {
            name: "Big\nBoss Man\r".into(),
        };
        assert_eq!(cmd.encode(), "name BigBoss Man");
    }

    #[test]
    fn test_encode_kick() {
        assert_eq!(Command::Kick { client: idx(7) }.encode(), "kick 7");
    }

    #[test]
    fn test_encode_bare_verbs() {
        assert_eq!(Command::Ready.encode(), "ready");
        assert_eq!(Command::Spectate.encode(), "spectate");
        assert_eq!(Command::StartGame.encode(), "startgame");
    }

    #[test]
    fn test_encode_allow_cheats() {
        assert_eq!(
            Command::AllowCheats { allow: true }.encode(),
            "allowcheats true"
        );
        assert_eq!(
            Command::AllowCheats { allow: false }.encode(),
            "allowcheats false"
        );
    }

    #[test]
    fn test_encode_map() {
        let cmd = Command::Map {
            uid: "a6c9f0d1".into(),
        };
        assert_eq!(cmd.encode(), "map a6c9f0d1");
    }

    // =====================================================================
    // Properties
    // =====================================================================

    #[test]
    fn test_encoding_is_deterministic() {
        let cmd = Command::Color {
            client: idx(9),
            color: ColorRamp::default(),
        };
        assert_eq!(cmd.encode(), cmd.clone().encode());
    }

    #[test]
    fn test_spawn_fields_recovered_from_template() {
        let encoded = Command::Spawn {
            client: idx(3),
            point: 2,
        }
        .encode();

        let tokens: Vec<&str> = encoded.split(' ').collect();
        assert_eq!(tokens[0], "spawn");
        let rebuilt = Command::Spawn {
            client: ClientIndex(tokens[1].parse().unwrap()),
            point: tokens[2].parse().unwrap(),
        };
        assert_eq!(rebuilt.encode(), encoded);
    }

    #[test]
    fn test_verb_is_first_token() {
        let cmd = Command::SlotBot {
            slot: SlotKey::from("Multi0"),
            bot: "EasyAI".into(),
        };
        assert!(cmd.encode().starts_with(cmd.verb()));
    }

    #[test]
    fn test_order_from_command() {
        let order: Order = Command::Ready.into();
        assert_eq!(order, Order::Command(Command::Ready));
    }
}
