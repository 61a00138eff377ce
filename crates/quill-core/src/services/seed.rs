use std::sync::Arc;

use crate::error::DomainError;
use crate::ports::{SampleCategory, SamplePost, Seeder};

pub const SAMPLE_CATEGORIES: &[SampleCategory] = &[
    SampleCategory {
        name: "Web Development",
        description: "Articles about web development and modern frameworks",
    },
    SampleCategory {
        name: "Programming",
        description: "Articles about programming and software development",
    },
    SampleCategory {
        name: "DevOps",
        description: "Deployment, infrastructure and operations",
    },
    SampleCategory {
        name: "JavaScript",
        description: "Articles and tutorials about JavaScript and the ecosystem",
    },
    SampleCategory {
        name: "TypeScript",
        description: "TypeScript tips, patterns and best practices",
    },
    SampleCategory {
        name: "Databases",
        description: "Database design, queries and optimization",
    },
    SampleCategory {
        name: "Tools & DevTools",
        description: "Build tooling, editors, linters, and CI/CD",
    },
    SampleCategory {
        name: "Design",
        description: "UI/UX and design system related posts",
    },
];

pub const SAMPLE_POSTS: &[SamplePost] = &[
    SamplePost {
        title: "Getting Started with Next.js and TypeScript",
        content: "# Getting Started with Next.js and TypeScript\n\n\
Next.js is a React framework with server-side rendering, static generation \
and file-system routing built in. Pairing it with TypeScript catches whole \
classes of mistakes before the page ever loads.\n\n\
## Creating a project\n\n\
```bash\nnpx create-next-app@latest --typescript\n```\n\n\
## Routing\n\n\
Every file under `pages/` becomes a route: `pages/about.tsx` is served at `/about`.\n",
        published: true,
        categories: &["Web Development"],
    },
    SamplePost {
        title: "Understanding TypeScript Generics",
        content: "# Understanding TypeScript Generics\n\n\
Generics let one function or type work over many types without giving up \
type safety. They behave like parameters, but for types.\n\n\
```typescript\nfunction identity<T>(arg: T): T {\n  return arg;\n}\n```\n\n\
## Constraints\n\n\
`T extends { length: number }` restricts `T` to types that have a length.\n",
        published: true,
        categories: &["Web Development", "Programming", "TypeScript"],
    },
    SamplePost {
        title: "Building REST APIs with Node.js and Express",
        content: "# Building REST APIs with Node.js and Express\n\n\
Express keeps the HTTP layer small: a router, middleware and handlers.\n\n\
```javascript\nconst app = express();\napp.get('/api/posts', (req, res) => res.json([]));\napp.listen(3000);\n```\n\n\
## Middleware\n\n\
Parsing, logging and error handling all plug in as middleware functions.\n",
        published: true,
        categories: &["Web Development", "Programming", "JavaScript"],
    },
    SamplePost {
        title: "Indexing Strategies for Relational Databases",
        content: "# Indexing Strategies for Relational Databases\n\n\
A unique index both speeds up lookups and enforces an invariant. Slugs are a \
good example: the index makes `WHERE slug = $1` fast and rejects duplicates.\n",
        published: false,
        categories: &["Databases"],
    },
];

/// Loads the demo data set.
#[derive(Clone)]
pub struct SeedService {
    seeder: Arc<dyn Seeder>,
}

impl SeedService {
    pub fn new(seeder: Arc<dyn Seeder>) -> Self {
        Self { seeder }
    }

    /// Insert the sample categories and posts. Running it again is a no-op.
    pub async fn run(&self) -> Result<(), DomainError> {
        self.seeder
            .load(SAMPLE_CATEGORIES, SAMPLE_POSTS)
            .await
            .map_err(|e| e.into_domain("seed", "sample data"))?;

        tracing::info!(
            categories = SAMPLE_CATEGORIES.len(),
            posts = SAMPLE_POSTS.len(),
            "Sample data loaded"
        );
        Ok(())
    }
}
