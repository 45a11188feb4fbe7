mod artifact;

pub use artifact::MavenArtifact;

/// Well-known Maven repositories used by the Minecraft ecosystem.
pub const MOJANG_LIBRARIES: &str = "https://libraries.minecraft.net";
pub const MAVEN_CENTRAL: &str = "https://repo1.maven.org/maven2";
pub const FORGE_MAVEN: &str = "https://maven.minecraftforge.net";
pub const FABRIC_MAVEN: &str = "https://maven.fabricmc.net";
pub const NEOFORGE_MAVEN: &str = "https://maven.neoforged.net/releases";

/// Repository for libraries that declare neither `downloads` nor `url`.
pub const DEFAULT_LIBRARY_REPOSITORY: &str = MAVEN_CENTRAL;
