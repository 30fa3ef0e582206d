//! # Built-in Redirect Rules
//!
//! The order of [`default_rules`] is the dispatch order. Several server
//! messages share a prefix, so rules that must win over a looser pattern are
//! registered first.

use crate::rule::PatternRule;
use regex::Captures;
use wynnparse_config::RedirectCategory as Category;
use wynnparse_core::Result;
use wynnparse_protocol::format_rank;
use wynnparse_protocol::ChatFormatting::{
    Aqua, Bold, DarkAqua, DarkGreen, DarkPurple, DarkRed, Gray, Green, LightPurple, Red, Reset,
};

/// Build the built-in rule table in registration order
///
/// # Errors
/// Returns an error if a pattern fails to compile
pub fn default_rules() -> Result<Vec<PatternRule>> {
    Ok(vec![
        PatternRule::new("CraftedDurability", Category::CraftedDurability, crafted_durability)
            .foreground(r"^§cYour items are damaged and have become less effective. Bring them to a Blacksmith to repair them.$")?,
        PatternRule::new("FriendJoin", Category::FriendJoin, friend_join)
            .foreground(r"§a(§o)?(?P<name>.+)§r§2 has logged into server §r§a(?P<server>.+)§r§2 as §r§aan? (?P<class>.+)")?
            .background(r"§r§7(§o)?(?P<name>.+)§r§8(§o)? has logged into server §r§7(§o)?(?P<server>.+)§r§8(§o)? as §r§7(§o)?an? (?P<class>.+)")?,
        PatternRule::new("FriendLeave", Category::FriendJoin, friend_leave)
            .foreground(r"§a(?P<name>.+) left the game.")?
            .background(r"§r§7(?P<name>.+) left the game.")?,
        PatternRule::new("Heal", Category::Heal, heal)
            .foreground(r"^§c\[\+(\d+) ❤\]$")?,
        PatternRule::new("HealedByOther", Category::Heal, heal)
            .foreground(r"^.+ gave you §r§c\[\+(\d+) ❤\]$")?
            .background(r"^.+ gave you §r§7§o\[\+(\d+) ❤\]$")?,
        PatternRule::new("HorseDespawned", Category::Horse, horse_despawned)
            .foreground(r"§dSince you interacted with your inventory, your horse has despawned.")?,
        PatternRule::new("HorseScared", Category::Horse, horse_scared)
            .foreground(r"§dYour horse is scared to come out right now, too many mobs are nearby.")?,
        PatternRule::new("HorseSpawnFail", Category::Horse, horse_spawn_fail)
            .foreground(r"§4There is no room for a horse.")?,
        PatternRule::new("HousingTeleportArrival", Category::HousingTeleport, housing_arrival)
            .foreground(r"^§aYou have flown to your housing island.$")?,
        PatternRule::new("HousingTeleportArrivalCooldown", Category::HousingTeleport, housing_cooldown)
            .foreground(r"^§cYou need to wait a bit before joining another house.$")?,
        PatternRule::new("HousingTeleportDeparture", Category::HousingTeleport, housing_departure)
            .foreground(r"^§aYou have flown to your original position.$")?,
        PatternRule::new("HousingTeleportDepartureCooldown", Category::HousingTeleport, housing_cooldown)
            .foreground(r"^§cYou need to wait a bit before leaving a house.$")?,
        PatternRule::new("IngredientPouchSell", Category::IngredientPouch, ingredient_pouch_sell)
            .foreground(r"§dYou have sold §r§7(\d+)§r§d ingredients for a total of §r§a(.+)§r§d\.$")?,
        PatternRule::new("Login", Category::LoginAnnouncements, login)
            .foreground(r"^§.\[§r§.([A-Z+]+)§r§.\] §r§.(.*)§r§. has just logged in!$")?
            .background(r"^(?:§r§8)?\[§r§7([A-Z+]+)§r§8\] §r§7(.*)§r§8 has just logged in!$")?,
        PatternRule::new("MageTeleportationFail", Category::MageTeleport, mage_teleport_fail)
            .foreground(r"^§cSorry, you can't teleport... Try moving away from blocks.$")?,
        PatternRule::new("ManaDeficit", Category::NotEnoughMana, mana_deficit)
            .foreground(r"^§4You don't have enough mana to cast that spell!$")?,
        PatternRule::new("NoTotem", Category::Shaman, no_totem)
            .foreground(r"§4You have no active totems near you$")?,
        PatternRule::new("PotionAlreadyActive", Category::Potion, potion_already_active)
            .foreground(r"^§cYou already have that potion active...$")?,
        PatternRule::new("PotionsMax", Category::Potion, potions_max)
            .foreground(r"§4You already are holding the maximum amount of potions allowed.")?,
        PatternRule::new("PotionsMoved", Category::Potion, potions_moved)
            .foreground(r"^§7You already are holding the maximum amount of potions allowed so your crafting result was moved to your bank.$")?,
        PatternRule::new("PotionsReplaced", Category::Potion, potions_replaced)
            .foreground(r"§7One less powerful potion was replaced to open space for the added one.")?,
        PatternRule::new("ScrollTeleportationHousingFail", Category::ScrollTeleport, scroll_housing_fail)
            .foreground(r"^§cYou can not teleport while inside a house...$")?,
        PatternRule::new("ScrollTeleportationMobFail", Category::ScrollTeleport, scroll_mob_fail)
            .foreground(r"§cThere are aggressive mobs nearby...$")?,
        PatternRule::new("SoulPointGainDiscarder", Category::SoulPoint, discard)
            .foreground(r"^§5As the sun rises, you feel a little bit safer...$")?
            .background(r"^(§r§8)?As the sun rises, you feel a little bit safer...$")?,
        PatternRule::new("SoulPointGain", Category::SoulPoint, soul_point_gain)
            .foreground(r"^§d(\[\+\d+ Soul Points?\])$")?
            .background(r"^§r§7(\[\+\d+ Soul Points?\])$")?,
        PatternRule::new("SoulPointLoss", Category::SoulPoint, soul_point_loss)
            .foreground(r"^§[47](\d+) soul points? (has|have) been lost...$")?,
        PatternRule::new("SpeedBoost", Category::Speed, speed_boost)
            .foreground(r"^§b\+([23]) minutes§r§7 speed boost.$")?,
        PatternRule::new("ToolDurability", Category::ToolDurability, tool_durability)
            .foreground(r"^§4Your tool has 0 durability left! You will not receive any new resources until you repair it at a Blacksmith.$")?,
        PatternRule::new("UnusedAbilityPoints", Category::UnusedPoints, unused_ability_points)
            .foreground(r"^§4You have §r§b§l(\d+) unused Ability Points?! §r§4Right-Click while holding your compass to use them$")?,
        PatternRule::new("UnusedSkillAndAbilityPoints", Category::UnusedPoints, unused_skill_and_ability_points)
            .foreground(r"^§4You have §r§c§l(\d+) unused Skill Points?§r§4 and §r§b§l(\d+) unused Ability Points?! §r§4Right-Click while holding your compass to use them$")?,
        PatternRule::new("UnusedSkillPoints", Category::UnusedPoints, unused_skill_points)
            .foreground(r"^§4You have §r§c§l(\d+) unused Skill Points?! §r§4Right-Click while holding your compass to use them$")?,
    ])
}

fn crafted_durability(_: &Captures<'_>) -> Vec<String> {
    vec![format!("{DarkRed}Your items are damaged.")]
}

fn friend_join(caps: &Captures<'_>) -> Vec<String> {
    vec![format!(
        "{Green}→ {DarkGreen}{} [{Green}{}/{}{DarkGreen}]",
        &caps["name"], &caps["server"], &caps["class"]
    )]
}

fn friend_leave(caps: &Captures<'_>) -> Vec<String> {
    vec![format!("{Red}← {DarkGreen}{}", &caps["name"])]
}

fn heal(caps: &Captures<'_>) -> Vec<String> {
    vec![format!("{DarkRed}[+{} ❤]", &caps[1])]
}

fn horse_despawned(_: &Captures<'_>) -> Vec<String> {
    vec![format!("{DarkPurple}Your horse has despawned.")]
}

fn horse_scared(_: &Captures<'_>) -> Vec<String> {
    vec![format!("{DarkRed}Nearby mobs prevent horse spawning!")]
}

fn horse_spawn_fail(_: &Captures<'_>) -> Vec<String> {
    vec![format!("{DarkRed}No room for a horse!")]
}

fn housing_arrival(_: &Captures<'_>) -> Vec<String> {
    vec![format!("{Gray}→ Housing Island")]
}

fn housing_departure(_: &Captures<'_>) -> Vec<String> {
    vec![format!("{Gray}← Housing Island")]
}

fn housing_cooldown(_: &Captures<'_>) -> Vec<String> {
    vec![format!("{DarkRed}Housing teleport is on cooldown!")]
}

fn ingredient_pouch_sell(caps: &Captures<'_>) -> Vec<String> {
    let (count, plural) = match caps[1].parse::<u64>() {
        Ok(count) => (count.to_string(), if count == 1 { "" } else { "s" }),
        Err(_) => (caps[1].to_string(), "s"),
    };
    vec![format!("§dSold §7{count} §dingredient{plural} §dfor §a{}§d.", &caps[2])]
}

fn login(caps: &Captures<'_>) -> Vec<String> {
    vec![format!("{Green}→ {}{}", format_rank(&caps[1]), &caps[2])]
}

fn mage_teleport_fail(_: &Captures<'_>) -> Vec<String> {
    vec![format!("{DarkRed}Unable to teleport! Move away from blocks.")]
}

fn mana_deficit(_: &Captures<'_>) -> Vec<String> {
    vec![format!("{DarkRed}Not enough mana to do that spell!")]
}

fn no_totem(_: &Captures<'_>) -> Vec<String> {
    vec![format!("{DarkRed}No totems nearby!")]
}

fn potion_already_active(_: &Captures<'_>) -> Vec<String> {
    vec![format!("{DarkRed}This potion is already active!")]
}

fn potions_max(_: &Captures<'_>) -> Vec<String> {
    vec![format!("{DarkRed}At potion charge limit!")]
}

fn potions_moved(_: &Captures<'_>) -> Vec<String> {
    vec![format!("{Gray}Moved excess healing items to bank.")]
}

fn potions_replaced(_: &Captures<'_>) -> Vec<String> {
    vec![format!("{Gray}Lesser potion replaced.")]
}

fn scroll_housing_fail(_: &Captures<'_>) -> Vec<String> {
    vec![format!("{DarkRed}Can't teleport on a housing island!")]
}

fn scroll_mob_fail(_: &Captures<'_>) -> Vec<String> {
    vec![format!("{DarkRed}Nearby mobs prevent scroll teleportation!")]
}

/// The sunrise line precedes every soul point gain; drop it silently
fn discard(_: &Captures<'_>) -> Vec<String> {
    Vec::new()
}

fn soul_point_gain(caps: &Captures<'_>) -> Vec<String> {
    vec![format!("{LightPurple}{}", &caps[1])]
}

fn soul_point_loss(caps: &Captures<'_>) -> Vec<String> {
    let count = &caps[1];
    // Digits only, but may still overflow
    let plural = if count.parse::<u64>().map_or(true, |n| n > 1) { "s" } else { "" };
    vec![format!("§4-{count} Soul Point{plural}")]
}

fn speed_boost(caps: &Captures<'_>) -> Vec<String> {
    vec![format!("{Aqua}+{} minutes{Gray} speed boost", &caps[1])]
}

fn tool_durability(_: &Captures<'_>) -> Vec<String> {
    vec![format!("{DarkRed}Your tool has 0 durability!")]
}

fn skill_points_message(count: &str) -> String {
    format!("{DarkRed}You have {Bold}{count}{Reset}{DarkRed} unused skill points")
}

fn ability_points_message(count: &str) -> String {
    format!("{DarkAqua}You have {Bold}{count}{Reset}{DarkAqua} unused ability points")
}

fn unused_ability_points(caps: &Captures<'_>) -> Vec<String> {
    vec![ability_points_message(&caps[1])]
}

fn unused_skill_points(caps: &Captures<'_>) -> Vec<String> {
    vec![skill_points_message(&caps[1])]
}

fn unused_skill_and_ability_points(caps: &Captures<'_>) -> Vec<String> {
    vec![skill_points_message(&caps[1]), ability_points_message(&caps[2])]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use wynnparse_core::ChatChannel::{self, Background, Foreground};

    /// One sample line per (rule, channel) pair and the notifications it projects to
    fn samples() -> Vec<(&'static str, ChatChannel, &'static str, Vec<&'static str>)> {
        vec![
            ("CraftedDurability", Foreground,
                "§cYour items are damaged and have become less effective. Bring them to a Blacksmith to repair them.",
                vec!["§4Your items are damaged."]),
            ("FriendJoin", Foreground,
                "§aAlice§r§2 has logged into server §r§aWC1§r§2 as §r§aa Mage",
                vec!["§a→ §2Alice [§aWC1/Mage§2]"]),
            ("FriendJoin", Background,
                "§r§7Alice§r§8 has logged into server §r§7WC1§r§8 as §r§7an Archer",
                vec!["§a→ §2Alice [§aWC1/Archer§2]"]),
            ("FriendLeave", Foreground, "§aAlice left the game.", vec!["§c← §2Alice"]),
            ("FriendLeave", Background, "§r§7Alice left the game.", vec!["§c← §2Alice"]),
            ("Heal", Foreground, "§c[+120 ❤]", vec!["§4[+120 ❤]"]),
            ("HealedByOther", Foreground, "Bob gave you §r§c[+50 ❤]", vec!["§4[+50 ❤]"]),
            ("HealedByOther", Background, "Bob gave you §r§7§o[+50 ❤]", vec!["§4[+50 ❤]"]),
            ("HorseDespawned", Foreground,
                "§dSince you interacted with your inventory, your horse has despawned.",
                vec!["§5Your horse has despawned."]),
            ("HorseScared", Foreground,
                "§dYour horse is scared to come out right now, too many mobs are nearby.",
                vec!["§4Nearby mobs prevent horse spawning!"]),
            ("HorseSpawnFail", Foreground, "§4There is no room for a horse.", vec!["§4No room for a horse!"]),
            ("HousingTeleportArrival", Foreground, "§aYou have flown to your housing island.",
                vec!["§7→ Housing Island"]),
            ("HousingTeleportArrivalCooldown", Foreground,
                "§cYou need to wait a bit before joining another house.",
                vec!["§4Housing teleport is on cooldown!"]),
            ("HousingTeleportDeparture", Foreground, "§aYou have flown to your original position.",
                vec!["§7← Housing Island"]),
            ("HousingTeleportDepartureCooldown", Foreground,
                "§cYou need to wait a bit before leaving a house.",
                vec!["§4Housing teleport is on cooldown!"]),
            ("IngredientPouchSell", Foreground,
                "§dYou have sold §r§73§r§d ingredients for a total of §r§a1²½§r§d.",
                vec!["§dSold §73 §dingredients §dfor §a1²½§d."]),
            ("Login", Foreground,
                "§6[§r§6VIP+§r§6] §r§6Alice§r§6 has just logged in!",
                vec!["§a→ §3[§bVIP+§3] Alice"]),
            ("Login", Background,
                "§r§8[§r§7HERO§r§8] §r§7Alice§r§8 has just logged in!",
                vec!["§a→ §5[§dHERO§5] Alice"]),
            ("MageTeleportationFail", Foreground,
                "§cSorry, you can't teleport... Try moving away from blocks.",
                vec!["§4Unable to teleport! Move away from blocks."]),
            ("ManaDeficit", Foreground, "§4You don't have enough mana to cast that spell!",
                vec!["§4Not enough mana to do that spell!"]),
            ("NoTotem", Foreground, "§4You have no active totems near you", vec!["§4No totems nearby!"]),
            ("PotionAlreadyActive", Foreground, "§cYou already have that potion active...",
                vec!["§4This potion is already active!"]),
            ("PotionsMax", Foreground, "§4You already are holding the maximum amount of potions allowed.",
                vec!["§4At potion charge limit!"]),
            ("PotionsMoved", Foreground,
                "§7You already are holding the maximum amount of potions allowed so your crafting result was moved to your bank.",
                vec!["§7Moved excess healing items to bank."]),
            ("PotionsReplaced", Foreground,
                "§7One less powerful potion was replaced to open space for the added one.",
                vec!["§7Lesser potion replaced."]),
            ("ScrollTeleportationHousingFail", Foreground, "§cYou can not teleport while inside a house...",
                vec!["§4Can't teleport on a housing island!"]),
            ("ScrollTeleportationMobFail", Foreground, "§cThere are aggressive mobs nearby...",
                vec!["§4Nearby mobs prevent scroll teleportation!"]),
            ("SoulPointGainDiscarder", Foreground, "§5As the sun rises, you feel a little bit safer...", vec![]),
            ("SoulPointGainDiscarder", Background, "§r§8As the sun rises, you feel a little bit safer...", vec![]),
            ("SoulPointGain", Foreground, "§d[+1 Soul Point]", vec!["§d[+1 Soul Point]"]),
            ("SoulPointGain", Foreground, "§d[+3 Soul Points]", vec!["§d[+3 Soul Points]"]),
            ("SoulPointGain", Background, "§r§7[+3 Soul Points]", vec!["§d[+3 Soul Points]"]),
            ("SoulPointLoss", Foreground, "§73 soul points have been lost...", vec!["§4-3 Soul Points"]),
            ("SpeedBoost", Foreground, "§b+3 minutes§r§7 speed boost.", vec!["§b+3 minutes§7 speed boost"]),
            ("ToolDurability", Foreground,
                "§4Your tool has 0 durability left! You will not receive any new resources until you repair it at a Blacksmith.",
                vec!["§4Your tool has 0 durability!"]),
            ("UnusedAbilityPoints", Foreground,
                "§4You have §r§b§l2 unused Ability Points! §r§4Right-Click while holding your compass to use them",
                vec!["§3You have §l2§r§3 unused ability points"]),
            ("UnusedSkillAndAbilityPoints", Foreground,
                "§4You have §r§c§l5 unused Skill Points§r§4 and §r§b§l2 unused Ability Points! §r§4Right-Click while holding your compass to use them",
                vec!["§4You have §l5§r§4 unused skill points", "§3You have §l2§r§3 unused ability points"]),
            ("UnusedSkillPoints", Foreground,
                "§4You have §r§c§l5 unused Skill Points! §r§4Right-Click while holding your compass to use them",
                vec!["§4You have §l5§r§4 unused skill points"]),
        ]
    }

    fn project(rule: &PatternRule, channel: ChatChannel, line: &str) -> Option<Vec<String>> {
        let pattern = rule.pattern(channel)?;
        let captures = pattern.captures(line)?;
        Some(rule.notifications(&captures))
    }

    #[test]
    fn test_registration_order() {
        let rules = default_rules().unwrap();
        assert_eq!(rules.len(), 31);
        assert_eq!(rules[0].name(), "CraftedDurability");
        assert_eq!(rules[23].name(), "SoulPointGainDiscarder");
        assert_eq!(rules[30].name(), "UnusedSkillPoints");

        let names: HashSet<_> = rules.iter().map(PatternRule::name).collect();
        assert_eq!(names.len(), rules.len());
    }

    #[test]
    fn test_every_rule_projects_its_sample() {
        let rules = default_rules().unwrap();

        for (name, channel, line, expected) in samples() {
            let rule = rules.iter().find(|rule| rule.name() == name).unwrap();
            let notifications = project(rule, channel, line)
                .unwrap_or_else(|| panic!("{name} did not match its {channel:?} sample"));
            assert_eq!(notifications, expected, "{name} {channel:?}");
            assert!(
                wynnparse_protocol::RawLine::new(line, channel).recipient().is_info(),
                "{name} {channel:?} sample is not a server line"
            );
        }
    }

    #[test]
    fn test_every_channel_pattern_has_a_sample() {
        let rules = default_rules().unwrap();
        let covered: HashSet<_> = samples().into_iter().map(|(name, channel, _, _)| (name, channel)).collect();

        for rule in &rules {
            for channel in [Foreground, Background] {
                if rule.pattern(channel).is_some() {
                    assert!(covered.contains(&(rule.name(), channel)), "{} {channel:?} untested", rule.name());
                }
            }
        }
    }

    #[test]
    fn test_pluralisation() {
        let rules = default_rules().unwrap();
        let find = |name: &str| rules.iter().find(|rule| rule.name() == name).unwrap();

        assert_eq!(
            project(find("SoulPointLoss"), Foreground, "§41 soul point has been lost...").unwrap(),
            vec!["§4-1 Soul Point"]
        );
        assert_eq!(
            project(
                find("IngredientPouchSell"),
                Foreground,
                "§dYou have sold §r§71§r§d ingredients for a total of §r§a64²§r§d."
            )
            .unwrap(),
            vec!["§dSold §71 §dingredient §dfor §a64²§d."]
        );
        assert_eq!(
            project(
                find("IngredientPouchSell"),
                Foreground,
                "§dYou have sold §r§701§r§d ingredients for a total of §r§a64²§r§d."
            )
            .unwrap(),
            vec!["§dSold §71 §dingredient §dfor §a64²§d."]
        );
    }

    #[test]
    fn test_unknown_rank_is_grey() {
        let rules = default_rules().unwrap();
        let login = rules.iter().find(|rule| rule.name() == "Login").unwrap();
        let notifications = project(
            login,
            Background,
            "[§r§7ELF§r§8] §r§7Bob§r§8 has just logged in!",
        )
        .unwrap();
        assert_eq!(notifications, vec!["§a→ §7[ELF] Bob"]);
    }
}
