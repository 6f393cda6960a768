use serde::Serialize;

/// A portfolio entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
    pub github_url: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_url: Option<&'static str>,
}

static PROJECTS: [Project; 4] = [
    Project {
        id: 1,
        title: "Optical Music Recognition (OMR) System",
        description: "Developed an AI-based system to automatically recognize and digitize musical notation from sheet music.",
        tags: &["Python", "TensorFlow", "CNN", "OpenCV"],
        github_url: "https://github.com/Yashwanth1524/OMR",
        live_url: None,
    },
    Project {
        id: 2,
        title: "Denoising Musical Sheet",
        description: "An API using FastAPI and OpenCV to clean and enhance noisy or damaged musical sheet images for improved recognition.",
        tags: &["Python", "FastAPI", "OpenCV"],
        github_url: "https://github.com/Yashwanth1524/OMR",
        live_url: Some("/denoise-demo/"),
    },
    Project {
        id: 3,
        title: "E-commerce Application with Servlets",
        description: "A comprehensive e-commerce platform built on Java servlets for server-side logic and database interaction.",
        tags: &["Java", "Servlets", "JSP", "HTML/CSS", "MySQL"],
        github_url: "https://github.com/Yashwanth1524/E-commerce-Application-with-Servlets",
        live_url: None,
    },
    Project {
        id: 4,
        title: "Blog Website with ReactJS and Firebase",
        description: "A dynamic blog website with user authentication and real-time content management, powered by React and Firebase.",
        tags: &["React", "Firebase", "HTML/CSS"],
        github_url: "https://github.com/Yashwanth1524/socio",
        live_url: None,
    },
];

/// All projects in display order
pub fn all() -> &'static [Project] {
    &PROJECTS
}

/// Project at `index`, falling back to the first one
pub fn by_index(index: usize) -> &'static Project {
    PROJECTS.get(index).unwrap_or(&PROJECTS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_ids_are_sequential() {
        let ids: Vec<u32> = all().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_live_url_is_omitted_when_absent() {
        let json = serde_json::to_value(all()).unwrap();
        assert!(json[0].get("live_url").is_none());
        assert_eq!(json[1]["live_url"], "/denoise-demo/");
        assert_eq!(json[2]["tags"][0], "Java");
    }

    #[test]
    fn test_by_index_out_of_range_falls_back() {
        assert_eq!(by_index(2).id, 3);
        assert_eq!(by_index(99).id, 1);
    }
}
