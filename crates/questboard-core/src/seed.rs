//! Bootstrap catalog inserted on first start.

use crate::catalog::{triggers, Achievement, Activity, Item, ItemCategory, Mission};
use crate::ids::{AchievementId, ActivityId, ItemId, MissionId};

/// A complete set of catalog reference data.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Shop items.
    pub items: Vec<Item>,
    /// Missions.
    pub missions: Vec<Mission>,
    /// Achievements.
    pub achievements: Vec<Achievement>,
    /// Learning activities.
    pub activities: Vec<Activity>,
}

impl Catalog {
    /// The default portal catalog.
    #[must_use]
    pub fn default_seed() -> Self {
        Self {
            items: default_items(),
            missions: default_missions(),
            achievements: default_achievements(),
            activities: default_activities(),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn mission(
    id: u32,
    name: &str,
    description: &str,
    code: &str,
    trigger: &str,
    goal: i64,
    reward_points: i64,
    reward_xp: i64,
) -> Mission {
    Mission {
        id: MissionId::new(id),
        name: name.into(),
        description: Some(description.into()),
        code: code.into(),
        trigger: trigger.into(),
        goal,
        reward_points,
        reward_xp,
    }
}

fn default_missions() -> Vec<Mission> {
    vec![
        mission(1, "Primer Paso Gamer", "Juega una partida de memoria.", "jugar_memoria_1", triggers::PLAY_MEMORY, 1, 10, 5),
        mission(2, "Veterano de Memoria", "Juega 5 partidas de memoria.", "jugar_memoria_5", triggers::PLAY_MEMORY, 5, 50, 30),
        mission(3, "Victoria Memoriosa", "Gana una partida de memoria.", "ganar_memoria_1", triggers::WIN_MEMORY, 1, 30, 15),
        mission(4, "Tic-Tac-Experto", "Juega una partida de Tic-Tac-Toe.", "jugar_tictactoe_1", triggers::PLAY_TICTACTOE, 1, 10, 5),
        mission(5, "Dominador del Tres en Raya", "Gana una partida de Tic-Tac-Toe.", "ganar_tictactoe_1", triggers::WIN_TICTACTOE, 1, 25, 12),
        mission(6, "Maestro del Tres en Raya", "Gana 3 partidas de Tic-Tac-Toe.", "ganar_tictactoe_3", triggers::WIN_TICTACTOE, 3, 75, 40),
        mission(7, "El Coleccionista", "Compra un marco en la tienda.", "comprar_marco_1", triggers::BUY_FRAME, 1, 20, 10),
        mission(8, "Gastador Inteligente", "Gasta un total de 100 puntos en la tienda.", "gastar_puntos_100", triggers::SPEND_POINTS, 100, 50, 25),
        mission(9, "Nueva Apariencia", "Cambia tu avatar en ajustes.", "cambiar_avatar_1", triggers::CHANGE_AVATAR, 1, 15, 8),
    ]
}

fn item(id: u32, name: &str, category: ItemCategory, description: &str, image: &str, price: i64) -> Item {
    Item {
        id: ItemId::new(id),
        name: name.into(),
        category,
        description: Some(description.into()),
        image_url: image.into(),
        price,
    }
}

fn default_items() -> Vec<Item> {
    vec![
        item(1, "Avatar de Panda", ItemCategory::Avatar, "Un adorable avatar de panda.", "avatar-2.png", 50),
        item(2, "Avatar de Cohete", ItemCategory::Avatar, "Un avatar que te llevará a las estrellas.", "avatar-3.png", 75),
        item(3, "Marco Estelar", ItemCategory::Frame, "Un marco brillante para tu perfil.", "marco-2.png", 100),
        item(4, "Marco de Bosque", ItemCategory::Frame, "Un marco que te conecta con la naturaleza.", "marco-3.png", 80),
    ]
}

fn default_achievements() -> Vec<Achievement> {
    let achievement = |id, name: &str, description: &str, image: &str, required_level| Achievement {
        id: AchievementId::new(id),
        name: name.into(),
        description: Some(description.into()),
        image_url: Some(image.into()),
        required_level,
    };

    vec![
        achievement(1, "Novato Gamificado", "Alcanza el nivel 2.", "logro-novato.png", 2),
        achievement(2, "Aprendiz Experto", "Alcanza el nivel 5.", "logro-experto.png", 5),
        achievement(3, "Maestro de Puntos", "Consigue 500 puntos.", "logro-puntos.png", 1),
    ]
}

fn default_activities() -> Vec<Activity> {
    let activity = |id, name: &str, description: &str| Activity {
        id: ActivityId::new(id),
        name: name.into(),
        description: Some(description.into()),
        reward_points: crate::catalog::DEFAULT_ACTIVITY_REWARD,
    };

    vec![
        activity(1, "Lectura de Artículo", "Lee un artículo científico sobre IA."),
        activity(2, "Participación en Foro", "Publica una pregunta o respuesta en el foro del curso."),
        activity(3, "Asistencia a Webinar", "Asiste a un webinar de la UBE."),
        activity(4, "Entrega de Tarea Extra", "Entrega una tarea opcional para puntos extra."),
    ]
}
