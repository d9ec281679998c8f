use std::sync::LazyLock;

use url::Url;

use super::{Category, ProbeDescriptor, Service, ServiceRegistry};

type ServiceRow = (&'static str, &'static str, &'static [u16]);

const CATALOGUE: &[(&str, &[ServiceRow])] = &[
    (
        "🎮 Core Services",
        &[
            (
                "Session Server (Auth)",
                "https://sessionserver.mojang.com/session/minecraft/profile/853c80ef3c3749fdaa49938b674adae6",
                &[200],
            ),
            (
                "Minecraft Services API",
                "https://api.minecraftservices.com/minecraft/profile/lookup/name/jeb_",
                &[200],
            ),
            (
                "Blocked Servers List",
                "https://sessionserver.mojang.com/blockedservers",
                &[200],
            ),
        ],
    ),
    (
        "📦 Download Services",
        &[
            (
                "Version Manifest (Primary)",
                "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json",
                &[200],
            ),
            (
                "Version Manifest (Legacy)",
                "https://launchermeta.mojang.com/mc/game/version_manifest.json",
                &[200],
            ),
            (
                "Libraries Server",
                "https://libraries.minecraft.net/com/mojang/authlib/3.16.29/authlib-3.16.29.jar",
                &[200],
            ),
            (
                "Launcher Content",
                "https://launchercontent.mojang.com/v2/javaPatchNotes.json",
                &[200],
            ),
        ],
    ),
    (
        "🎨 Assets & Textures",
        &[(
            "Textures Server",
            "https://textures.minecraft.net/version/1",
            &[200, 404],
        )],
    ),
    (
        "🔧 Legacy APIs",
        &[(
            "Mojang API (Legacy)",
            "https://api.mojang.com/users/profiles/minecraft/jeb_",
            &[200, 403],
        )],
    ),
    (
        "🔐 Authentication",
        &[
            (
                "Xbox Live Auth",
                "https://user.auth.xboxlive.com/user/authenticate",
                &[400, 415],
            ),
            (
                "XSTS Token Service",
                "https://xsts.auth.xboxlive.com/xsts/authorize",
                &[400, 415],
            ),
        ],
    ),
];

static BUILTIN: LazyLock<ServiceRegistry> = LazyLock::new(|| {
    let categories = CATALOGUE
        .iter()
        .map(|(name, rows)| Category {
            name: name.to_string(),
            services: rows
                .iter()
                .map(|(service, url, codes)| Service {
                    name: service.to_string(),
                    descriptor: ProbeDescriptor::new(
                        Url::parse(url).expect("built-in registry URL"),
                        codes.iter().copied(),
                    ),
                })
                .collect(),
        })
        .collect();
    ServiceRegistry { categories }
});

/// The Mojang / Minecraft endpoint catalogue the dashboard ships with.
pub fn builtin() -> ServiceRegistry {
    BUILTIN.clone()
}
